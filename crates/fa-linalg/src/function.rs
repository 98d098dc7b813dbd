use fa_tensor::{Matrix, Result, Scalar};

use crate::eigen::Eigen;
use crate::inverse::Inverse;

/// Evaluates `f(A) = P·diag(f(λ))·P⁻¹` on a symmetric or diagonal matrix.
///
/// The reconstruction is always symmetrized before it is returned, which
/// cancels the asymmetry rounding leaves in `P·Λ'·P⁻¹`.
///
/// # Errors
/// Fails for general-packed input, or if the eigenvector matrix is singular.
pub fn function<T, const D: usize, F>(a: &Matrix<T, D, D>, f: F) -> Result<Matrix<T, D, D>>
where
    T: Scalar,
    F: Fn(T) -> T,
    Matrix<T, D, D>: Eigen<T, D> + Inverse,
{
    let lambda = a.eigenvalues()?.map_stored(f);
    let p = a.eigenvectors()?;
    let p_inv = p.inverse()?;
    Ok((p * Matrix::from_diagonal(&lambda) * p_inv).symmetric())
}

/// `√A` for a symmetric positive semi-definite `A`.
pub fn sqrt<T, const D: usize>(a: &Matrix<T, D, D>) -> Result<Matrix<T, D, D>>
where
    T: Scalar,
    Matrix<T, D, D>: Eigen<T, D> + Inverse,
{
    function(a, T::sqrt)
}

/// The matrix exponential of a symmetric `A`.
pub fn exp<T, const D: usize>(a: &Matrix<T, D, D>) -> Result<Matrix<T, D, D>>
where
    T: Scalar,
    Matrix<T, D, D>: Eigen<T, D> + Inverse,
{
    function(a, T::exp)
}
