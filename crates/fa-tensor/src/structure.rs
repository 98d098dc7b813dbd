//! Shape-level operations: transposition, symmetric and skew parts, rows,
//! columns and diagonals, and the vector/matrix products.

use std::ops::Mul;

use crate::error::{violation, Result, TensorError};
use crate::packing::Packing;
use crate::scalar::Scalar;
use crate::tensor::{Matrix, Tensor, Vector};

/// Diagonal and symmetric packings collapse to general for 1x1 matrices,
/// which share their shape with vectors.
fn square_packing(packing: Packing, dim: usize) -> Packing {
    if dim > 1 {
        packing
    } else {
        Packing::General
    }
}

impl<T: Scalar, const R: usize, const C: usize> Tensor<T, R, C> {
    /// The transpose. Diagonal and symmetric matrices are their own
    /// transpose and keep their packing.
    pub fn transpose(&self) -> Tensor<T, C, R> {
        let mut out = Tensor::<T, C, R>::blank(self.packing);
        match self.packing {
            Packing::General => {
                for i in 0..R {
                    for j in 0..C {
                        out.cells[j][i] = self.cells[i][j];
                    }
                }
            }
            Packing::Diagonal | Packing::Symmetric => {
                out.as_mut_slice().copy_from_slice(self.as_slice());
            }
        }
        out
    }

    /// Row `i` as a vector.
    ///
    /// # Errors
    /// Fails if `i >= R`.
    pub fn row(&self, i: usize) -> Result<Vector<T, C>> {
        let mut out = Vector::<T, C>::zeros();
        for j in 0..C {
            out[j] = self.get([i, j])?;
        }
        Ok(out)
    }

    /// Column `j` as a vector.
    ///
    /// # Errors
    /// Fails if `j >= C`.
    pub fn col(&self, j: usize) -> Result<Vector<T, R>> {
        let mut out = Vector::<T, R>::zeros();
        for i in 0..R {
            out[i] = self.get([i, j])?;
        }
        Ok(out)
    }

    /// A general zero matrix whose row `k` equals `v`.
    pub fn from_row(k: usize, v: &Vector<T, C>) -> Result<Self> {
        let mut out = Self::zeros();
        for j in 0..C {
            out.set([k, j], v[j])?;
        }
        Ok(out)
    }

    /// A general zero matrix whose column `k` equals `v`.
    pub fn from_column(k: usize, v: &Vector<T, R>) -> Result<Self> {
        let mut out = Self::zeros();
        for i in 0..R {
            out.set([i, k], v[i])?;
        }
        Ok(out)
    }

    /// Square root of the sum of squares of the stored cells.
    pub fn norm(&self) -> T {
        self.as_slice()
            .iter()
            .fold(T::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }
}

impl<T: Scalar, const D: usize> Tensor<T, D, D> {
    pub fn trace(&self) -> T {
        (0..D).fold(T::zero(), |acc, i| acc + self.at([i, i]))
    }

    /// The diagonal entries as a vector.
    pub fn diagonal_entries(&self) -> Vector<T, D> {
        let mut out = Vector::<T, D>::zeros();
        for i in 0..D {
            out[i] = self.at([i, i]);
        }
        out
    }

    /// The diagonal matrix with `v` on its diagonal.
    pub fn from_diagonal(v: &Vector<T, D>) -> Self {
        let mut out = Self::blank(square_packing(Packing::Diagonal, D));
        for i in 0..D {
            let slot = out.layout().offset([i, i]).unwrap_or(i);
            out[slot] = v[i];
        }
        out
    }

    /// `(A + Aᵀ) / 2`, symmetric-packed.
    pub fn symmetric(&self) -> Self {
        let half = T::cast(0.5);
        let mut out = Self::blank(square_packing(Packing::Symmetric, D));
        for (slot, [i, j]) in out.layout().iter().enumerate() {
            out[slot] = half * (self.at([i, j]) + self.at([j, i]));
        }
        out
    }

    /// `(A - Aᵀ) / 2`. Symmetric and diagonal matrices have a zero skew part,
    /// returned diagonal-packed.
    pub fn skew(&self) -> Self {
        match self.packing {
            Packing::General => (*self - self.transpose()).scale(T::cast(0.5)),
            Packing::Diagonal | Packing::Symmetric => {
                Self::blank(square_packing(Packing::Diagonal, D))
            }
        }
    }
}

impl<T: Scalar, const D: usize> Tensor<T, D, 1> {
    /// Scalar product.
    pub fn dot(&self, other: &Self) -> T {
        (0..D).fold(T::zero(), |acc, i| acc + self[i] * other[i])
    }
}

impl<T: Scalar> Tensor<T, 3, 1> {
    /// The skew matrix `[a]ₓ` with `[a]ₓ b == a × b`.
    pub fn hat(&self) -> Matrix<T, 3, 3> {
        let [x, y, z] = self.to_array();
        let o = T::zero();
        Matrix::from_rows([[o, -z, y], [z, o, -x], [-y, x, o]])
    }

    pub fn cross(&self, other: &Self) -> Self {
        self.hat() * other
    }
}

impl<T: Scalar> Tensor<T, 2, 1> {
    /// The z-component of the cross product of the two vectors embedded in
    /// the plane.
    pub fn cross(&self, other: &Self) -> T {
        let [a0, a1] = self.to_array();
        let [b0, b1] = other.to_array();
        let a = Vector::from_array([a0, a1, T::zero()]);
        let b = Vector::from_array([b0, b1, T::zero()]);
        a.cross(&b)[2]
    }
}

fn matmul<T: Scalar, const R: usize, const K: usize, const C: usize>(
    a: &Tensor<T, R, K>,
    b: &Tensor<T, K, C>,
) -> Tensor<T, R, C> {
    let packing = match (a.packing, b.packing) {
        (Packing::Diagonal, Packing::Diagonal) => Packing::Diagonal,
        _ => Packing::General,
    };
    let mut out = Tensor::<T, R, C>::blank(packing);
    for (slot, [i, j]) in out.layout().iter().enumerate() {
        out[slot] = (0..K).fold(T::zero(), |acc, p| acc + a.at([i, p]) * b.at([p, j]));
    }
    out
}

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<&Tensor<T, K, C>>
    for &Tensor<T, R, K>
{
    type Output = Tensor<T, R, C>;

    fn mul(self, rhs: &Tensor<T, K, C>) -> Tensor<T, R, C> {
        matmul(self, rhs)
    }
}

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<Tensor<T, K, C>>
    for Tensor<T, R, K>
{
    type Output = Tensor<T, R, C>;

    fn mul(self, rhs: Tensor<T, K, C>) -> Tensor<T, R, C> {
        matmul(&self, &rhs)
    }
}

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<&Tensor<T, K, C>>
    for Tensor<T, R, K>
{
    type Output = Tensor<T, R, C>;

    fn mul(self, rhs: &Tensor<T, K, C>) -> Tensor<T, R, C> {
        matmul(&self, rhs)
    }
}

impl<T: Scalar, const R: usize, const K: usize, const C: usize> Mul<Tensor<T, K, C>>
    for &Tensor<T, R, K>
{
    type Output = Tensor<T, R, C>;

    fn mul(self, rhs: Tensor<T, K, C>) -> Tensor<T, R, C> {
        matmul(self, &rhs)
    }
}

/// Checks a square matrix is symmetric-packed or diagonal-packed before an
/// operation that is only defined for those packings.
pub fn require_symmetric<T: Scalar, const D: usize>(
    op: &'static str,
    a: &Matrix<T, D, D>,
) -> Result<()> {
    match a.packing() {
        Packing::Symmetric | Packing::Diagonal => Ok(()),
        packing => Err(violation(TensorError::UnsupportedPacking { op, packing })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a3() -> Matrix<f64, 3, 3> {
        Matrix::from_rows([[1.0, -2.0, 0.0], [0.0, 1.0, 2.0], [0.0, 1.0, 1.0]])
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let at = a.transpose();
        assert_eq!(at, Matrix::from_rows([[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]));
        assert_eq!(at.transpose(), a);
    }

    #[test]
    fn test_transpose_keeps_packing() {
        let s = Matrix::<f64, 2, 2>::from_cells(Packing::Symmetric, &[1., 2., 3.]).unwrap();
        assert_eq!(s.transpose().packing(), Packing::Symmetric);
        assert_eq!(s.transpose(), s);
    }

    #[test]
    fn test_trace_and_diagonal() {
        assert_eq!(a3().trace(), 3.0);
        assert_eq!(a3().diagonal_entries(), Vector::from_array([1.0, 1.0, 1.0]));
        let d = Matrix::from_diagonal(&Vector::from_array([1.0, 2.0]));
        assert_eq!(d.packing(), Packing::Diagonal);
        assert_eq!(d, Matrix::from_rows([[1.0, 0.0], [0.0, 2.0]]));
    }

    #[test]
    fn test_symmetric_and_skew_decompose() {
        let a = a3();
        let sym = a.symmetric();
        let skew = a.skew();
        assert_eq!(sym.packing(), Packing::Symmetric);
        assert_eq!(skew.transpose(), -skew);
        assert_eq!(sym + skew, a);
    }

    #[test]
    fn test_skew_of_symmetric_is_zero() {
        let s = a3().symmetric();
        assert_eq!(s.skew(), Matrix::zeros());
        assert_eq!(s.skew().packing(), Packing::Diagonal);
    }

    #[test]
    fn test_rows_and_columns() {
        let a = a3();
        assert_eq!(a.row(1).unwrap(), Vector::from_array([0.0, 1.0, 2.0]));
        assert_eq!(a.col(1).unwrap(), Vector::from_array([-2.0, 1.0, 1.0]));
        assert!(a.row(3).is_err());

        let v = Vector::from_array([1.0, 2.0, 3.0]);
        let r = Matrix::<f64, 3, 3>::from_row(2, &v).unwrap();
        assert_eq!(r.row(2).unwrap(), v);
        assert_eq!(r.row(0).unwrap(), Vector::zeros());
        let c = Matrix::<f64, 3, 3>::from_column(0, &v).unwrap();
        assert_eq!(c.col(0).unwrap(), v);
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::from_rows([[5.0, 6.0], [7.0, 8.0]]);
        assert_eq!(&a * &b, Matrix::from_rows([[19.0, 22.0], [43.0, 50.0]]));

        let v = Vector::from_array([1.0, 1.0]);
        assert_eq!(a * v, Vector::from_array([3.0, 7.0]));
    }

    #[test]
    fn test_matmul_rectangular() {
        let a = Matrix::from_rows([[1.0, 2.0, 3.0]]);
        let b = Matrix::from_rows([[1.0], [1.0], [1.0]]);
        let c: Matrix<f64, 1, 1> = a * b;
        assert_eq!(c.at([0, 0]), 6.0);
    }

    #[test]
    fn test_matmul_diagonal_stays_diagonal() {
        let d = Matrix::from_diagonal(&Vector::from_array([2.0, 3.0]));
        let p = d * d;
        assert_eq!(p.packing(), Packing::Diagonal);
        assert_eq!(p.diagonal_entries(), Vector::from_array([4.0, 9.0]));
    }

    #[test]
    fn test_dot_and_cross() {
        let e0 = Vector::<f64, 3>::unit(0).unwrap();
        let e1 = Vector::<f64, 3>::unit(1).unwrap();
        let e2 = Vector::<f64, 3>::unit(2).unwrap();
        assert_eq!(e0.dot(&e1), 0.0);
        assert_eq!(e0.cross(&e1), e2);
        assert_eq!(e1.cross(&e0), -e2);

        let a = Vector::from_array([1.0, 0.0]);
        let b = Vector::from_array([0.0, 2.0]);
        assert_eq!(a.cross(&b), 2.0);
    }

    #[test]
    fn test_hat_matches_cross() {
        let a = Vector::from_array([1.0, 2.0, 3.0]);
        let b = Vector::from_array([-4.0, 0.5, 2.0]);
        assert_eq!(a.hat() * b, a.cross(&b));
        assert_eq!(a.hat().transpose(), -a.hat());
    }

    #[test]
    fn test_norm() {
        assert_eq!(Vector::from_array([3.0, 4.0]).norm(), 5.0);
        assert_eq!(Matrix::<f64, 3, 3>::identity().norm(), 3.0f64.sqrt());
    }

    #[test]
    fn test_require_symmetric() {
        assert!(require_symmetric("op", &a3().symmetric()).is_ok());
        assert!(require_symmetric("op", &Matrix::<f64, 3, 3>::identity()).is_ok());
        assert_eq!(
            require_symmetric("eigenvalues", &a3()),
            Err(TensorError::UnsupportedPacking {
                op: "eigenvalues",
                packing: Packing::General
            })
        );
    }
}
