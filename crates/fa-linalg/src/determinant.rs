use fa_tensor::{Matrix, Scalar};

/// Closed-form determinant of a small square matrix.
pub trait Determinant<T> {
    fn determinant(&self) -> T;
}

impl<T: Scalar> Determinant<T> for Matrix<T, 2, 2> {
    fn determinant(&self) -> T {
        let a = |i, j| self.at([i, j]);
        a(0, 0) * a(1, 1) - a(0, 1) * a(1, 0)
    }
}

impl<T: Scalar> Determinant<T> for Matrix<T, 3, 3> {
    /// Cofactor expansion along the first row.
    fn determinant(&self) -> T {
        let a = |i, j| self.at([i, j]);
        a(0, 0) * (a(1, 1) * a(2, 2) - a(1, 2) * a(2, 1))
            - a(0, 1) * (a(1, 0) * a(2, 2) - a(1, 2) * a(2, 0))
            + a(0, 2) * (a(1, 0) * a(2, 1) - a(1, 1) * a(2, 0))
    }
}

impl<T: Scalar> Determinant<T> for Matrix<T, 4, 4> {
    /// Laplace expansion over the 2x2 minors of the top and bottom row pairs.
    fn determinant(&self) -> T {
        let a = |i, j| self.at([i, j]);
        let top = |j: usize, k: usize| a(0, j) * a(1, k) - a(0, k) * a(1, j);
        let bottom = |j: usize, k: usize| a(2, j) * a(3, k) - a(2, k) * a(3, j);

        top(0, 1) * bottom(2, 3) - top(0, 2) * bottom(1, 3) + top(0, 3) * bottom(1, 2)
            + top(1, 2) * bottom(0, 3)
            - top(1, 3) * bottom(0, 2)
            + top(2, 3) * bottom(0, 1)
    }
}

/// Determinant of `a`.
pub fn det<T, M: Determinant<T>>(a: &M) -> T {
    a.determinant()
}
