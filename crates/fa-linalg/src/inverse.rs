use fa_tensor::error::violation;
use fa_tensor::{is_equal, Matrix, Packing, Result, Scalar, TensorError};

use crate::determinant::Determinant;

/// Matrix inverse by adjugate over determinant.
///
/// The result keeps the packing of the input.
pub trait Inverse: Sized {
    /// # Errors
    /// Returns [`TensorError::Singular`] when the determinant is the additive
    /// identity within one representable step.
    fn inverse(&self) -> Result<Self>;
}

fn singular<T: Scalar>(determinant: T) -> TensorError {
    violation(TensorError::Singular {
        determinant: determinant.widen(),
    })
}

/// Reciprocal of each diagonal entry. Callers reject a singular matrix
/// through its determinant first, so every entry is non-zero.
fn diagonal_inverse<T: Scalar, const D: usize>(a: &Matrix<T, D, D>) -> Matrix<T, D, D> {
    Matrix::from_diagonal(&a.diagonal_entries().map_stored(|v| T::one() / v))
}

/// The adjugate formula yields a general matrix; symmetric inputs get their
/// packing back.
fn mirror_packing<T: Scalar, const D: usize>(
    a: &Matrix<T, D, D>,
    out: Matrix<T, D, D>,
) -> Matrix<T, D, D> {
    match a.packing() {
        Packing::Symmetric => out.symmetric(),
        _ => out,
    }
}

fn reciprocal_determinant<T: Scalar, M: Determinant<T>>(a: &M) -> Result<T> {
    let det = a.determinant();
    if is_equal(det, T::zero()) {
        return Err(singular(det));
    }
    Ok(T::one() / det)
}

impl<T: Scalar> Inverse for Matrix<T, 2, 2> {
    fn inverse(&self) -> Result<Self> {
        let r = reciprocal_determinant(self)?;
        if self.packing() == Packing::Diagonal {
            return Ok(diagonal_inverse(self));
        }
        let a = |i, j| self.at([i, j]);
        let out = Matrix::from_rows([
            [r * a(1, 1), -r * a(0, 1)],
            [-r * a(1, 0), r * a(0, 0)],
        ]);
        Ok(mirror_packing(self, out))
    }
}

impl<T: Scalar> Inverse for Matrix<T, 3, 3> {
    fn inverse(&self) -> Result<Self> {
        let r = reciprocal_determinant(self)?;
        if self.packing() == Packing::Diagonal {
            return Ok(diagonal_inverse(self));
        }
        let a = |i, j| self.at([i, j]);
        let out = Matrix::from_rows([
            [
                r * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1)),
                r * (a(0, 2) * a(2, 1) - a(0, 1) * a(2, 2)),
                r * (a(0, 1) * a(1, 2) - a(0, 2) * a(1, 1)),
            ],
            [
                r * (a(1, 2) * a(2, 0) - a(1, 0) * a(2, 2)),
                r * (a(0, 0) * a(2, 2) - a(0, 2) * a(2, 0)),
                r * (a(0, 2) * a(1, 0) - a(0, 0) * a(1, 2)),
            ],
            [
                r * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0)),
                r * (a(0, 1) * a(2, 0) - a(0, 0) * a(2, 1)),
                r * (a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0)),
            ],
        ]);
        Ok(mirror_packing(self, out))
    }
}

/// Inverse of `a`.
pub fn inverse<M: Inverse>(a: &M) -> Result<M> {
    a.inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_2x2() {
        let a = Matrix::from_rows([[4.0, 7.0], [2.0, 6.0]]);
        let inv = a.inverse().unwrap();
        assert_relative_eq!(inv, Matrix::from_rows([[0.6, -0.7], [-0.2, 0.4]]), epsilon = 1e-12);
        assert_relative_eq!(a * inv, Matrix::identity(), epsilon = 1e-12);
        assert_eq!(inv.packing(), Packing::General);
    }

    #[test]
    fn test_inverse_3x3() {
        let a = Matrix::from_rows([[1.0, -2.0, 0.0], [0.0, 1.0, 2.0], [0.0, 1.0, 1.0]]);
        let inv = inverse(&a).unwrap();
        assert_relative_eq!(
            inv,
            Matrix::from_rows([[1.0, -2.0, 4.0], [0.0, -1.0, 2.0], [0.0, 1.0, -1.0]]),
            epsilon = 1e-12
        );
        assert_relative_eq!(inv * a, Matrix::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_keeps_packing() {
        let s = Matrix::<f64, 3, 3>::from_cells(Packing::Symmetric, &[2.0, 1.0, 0.0, 3.0, 1.0, 4.0])
            .unwrap();
        let inv = s.inverse().unwrap();
        assert_eq!(inv.packing(), Packing::Symmetric);
        assert_relative_eq!(s * inv, Matrix::identity(), epsilon = 1e-12);

        let d = Matrix::<f64, 2, 2>::from_cells(Packing::Diagonal, &[2.0, -4.0]).unwrap();
        let inv = d.inverse().unwrap();
        assert_eq!(inv.packing(), Packing::Diagonal);
        assert_eq!(inv.as_slice(), &[0.5, -0.25]);
    }

    #[test]
    fn test_singular() {
        let a = Matrix::from_rows([[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(
            a.inverse(),
            Err(TensorError::Singular { determinant: 0.0 })
        );

        let d = Matrix::<f64, 3, 3>::from_cells(Packing::Diagonal, &[1.0, 0.0, 3.0]).unwrap();
        assert!(matches!(d.inverse(), Err(TensorError::Singular { .. })));
    }

    #[test]
    fn test_singular_trigger_ignores_packing() {
        // non-zero entries whose determinant underflows to zero
        let tiny = 1e-200;
        let d = Matrix::<f64, 3, 3>::from_cells(Packing::Diagonal, &[tiny, tiny, tiny]).unwrap();
        let s = Matrix::<f64, 3, 3>::from_cells(Packing::Symmetric, &[tiny, 0.0, 0.0, tiny, 0.0, tiny])
            .unwrap();
        let g = Matrix::from_rows([[tiny, 0.0, 0.0], [0.0, tiny, 0.0], [0.0, 0.0, tiny]]);
        assert_eq!(d, s);
        let singular = Err(TensorError::Singular { determinant: 0.0 });
        assert_eq!(d.inverse(), singular);
        assert_eq!(s.inverse(), singular);
        assert_eq!(g.inverse(), singular);

        let d = Matrix::<f64, 2, 2>::from_cells(Packing::Diagonal, &[2.0, 8.0]).unwrap();
        let s = Matrix::<f64, 2, 2>::from_cells(Packing::Symmetric, &[2.0, 0.0, 8.0]).unwrap();
        assert_eq!(d.inverse().unwrap(), s.inverse().unwrap());
    }
}
