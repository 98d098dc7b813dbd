//! Closed-form eigen decomposition of small symmetric matrices.
//!
//! Diagonal matrices of any size are their own decomposition: the
//! eigenvalues are the diagonal entries and the eigenvectors the canonical
//! basis. Symmetric 2x2 and 3x3 matrices go through the closed-form roots of
//! their characteristic polynomial. General-packed matrices are rejected.

use std::f64::consts::PI;

use fa_tensor::structure::require_symmetric;
use fa_tensor::{Matrix, Packing, Result, Scalar, Vector};

/// Eigenvalues and eigenvectors of a square matrix of order `D`.
///
/// The eigenvectors are returned as the columns of a matrix, column `k`
/// belonging to eigenvalue `k`.
pub trait Eigen<T, const D: usize> {
    /// # Errors
    /// Returns [`fa_tensor::TensorError::UnsupportedPacking`] for
    /// general-packed input.
    fn eigenvalues(&self) -> Result<Vector<T, D>>;

    /// # Errors
    /// Returns [`fa_tensor::TensorError::UnsupportedPacking`] for
    /// general-packed input.
    fn eigenvectors(&self) -> Result<Matrix<T, D, D>>;
}

/// Eigenvalues of a diagonal matrix, in diagonal order.
pub fn diagonal_eigenvalues<T: Scalar, const D: usize>(a: &Matrix<T, D, D>) -> Vector<T, D> {
    a.diagonal_entries()
}

/// Eigenvectors of a diagonal matrix: the canonical basis.
pub fn diagonal_eigenvectors<T: Scalar, const D: usize>(_a: &Matrix<T, D, D>) -> Matrix<T, D, D> {
    Matrix::identity()
}

impl<T: Scalar> Eigen<T, 2> for Matrix<T, 2, 2> {
    /// The larger root comes first.
    fn eigenvalues(&self) -> Result<Vector<T, 2>> {
        require_symmetric("eigenvalues", self)?;
        if self.packing() == Packing::Diagonal {
            return Ok(diagonal_eigenvalues(self));
        }
        let (a00, a01, a11) = (self.at([0, 0]), self.at([0, 1]), self.at([1, 1]));
        let half = T::cast(0.5);
        let delta = discriminant(a00, a01, a11);
        Ok(Vector::from_array([
            half * (a00 + a11 + delta),
            half * (a00 + a11 - delta),
        ]))
    }

    fn eigenvectors(&self) -> Result<Matrix<T, 2, 2>> {
        require_symmetric("eigenvectors", self)?;
        if self.packing() == Packing::Diagonal {
            return Ok(diagonal_eigenvectors(self));
        }
        let (a00, a01, a11) = (self.at([0, 0]), self.at([0, 1]), self.at([1, 1]));
        let (o, l) = (T::zero(), T::one());
        let delta = discriminant(a00, a01, a11);
        let two_a01 = T::cast(2.0) * a01;
        // (λ₊ - a11, a01) and (a01, λ₊ - a00) both span the + eigenspace;
        // take the one whose sum does not cancel
        let (x, y) = if a00 >= a11 {
            (a00 - a11 + delta, two_a01)
        } else {
            (two_a01, a11 - a00 + delta)
        };
        let n = x.hypot(y);
        if n == o {
            // a multiple of the identity
            return Ok(Matrix::from_rows([[l, o], [o, l]]));
        }
        let (x, y) = (x / n, y / n);
        // the second column is orthogonal to the first; for an already
        // diagonal input this yields the identity or the swapped identity
        Ok(if a00 >= a11 {
            Matrix::from_rows([[x, -y], [y, x]])
        } else {
            Matrix::from_rows([[x, y], [y, -x]])
        })
    }
}

/// `√(4·a01² + (a00 - a11)²)`, without intermediate underflow.
fn discriminant<T: Scalar>(a00: T, a01: T, a11: T) -> T {
    (T::cast(2.0) * a01).hypot(a00 - a11)
}

impl<T: Scalar> Eigen<T, 3> for Matrix<T, 3, 3> {
    /// Ordered `d - e·cos(φ/3)`, `d + e·cos((φ-π)/3)`, `d + e·cos((φ+π)/3)`:
    /// smallest, largest, middle.
    fn eigenvalues(&self) -> Result<Vector<T, 3>> {
        require_symmetric("eigenvalues", self)?;
        if self.packing() == Packing::Diagonal {
            return Ok(diagonal_eigenvalues(self));
        }
        Ok(symmetric_eigenvalues(self))
    }

    fn eigenvectors(&self) -> Result<Matrix<T, 3, 3>> {
        require_symmetric("eigenvectors", self)?;
        if self.packing() == Packing::Diagonal {
            return Ok(diagonal_eigenvectors(self));
        }
        let lambda = symmetric_eigenvalues(self);
        Ok(symmetric_eigenvectors(self, &lambda))
    }
}

fn symmetric_eigenvalues<T: Scalar>(a: &Matrix<T, 3, 3>) -> Vector<T, 3> {
    let c = T::cast;
    let (a00, a11, a22) = (a.at([0, 0]), a.at([1, 1]), a.at([2, 2]));
    let (a01, a02, a12) = (a.at([0, 1]), a.at([0, 2]), a.at([1, 2]));

    let x1 = a00 * a00 + a11 * a11 + a22 * a22 - a00 * a11 - a00 * a22 - a11 * a22
        + c(3.0) * (a01 * a01 + a02 * a02 + a12 * a12);
    let p = c(2.0) * a00 - a11 - a22;
    let q = c(2.0) * a11 - a00 - a22;
    let r = c(2.0) * a22 - a00 - a11;
    let x2 = -(p * q * r) + c(9.0) * (r * a01 * a01 + q * a02 * a02 + p * a12 * a12)
        - c(54.0) * a01 * a02 * a12;

    let d = (a00 + a11 + a22) / c(3.0);
    let root_x1 = x1.max(T::zero()).sqrt();
    let e = c(2.0) * root_x1 / c(3.0);
    // 4·x1³ - x2², factored to keep the cube out of overflow range
    let radicand = (c(2.0) * root_x1 * x1 - x2) * (c(2.0) * root_x1 * x1 + x2);
    let phi = radicand.max(T::zero()).sqrt().atan2(x2);

    let pi = c(PI);
    let three = c(3.0);
    Vector::from_array([
        d - e * (phi / three).cos(),
        d + e * ((phi - pi) / three).cos(),
        d + e * ((phi + pi) / three).cos(),
    ])
}

/// Rows of `A - λI`.
fn shifted_rows<T: Scalar>(a: &Matrix<T, 3, 3>, lambda: T) -> [Vector<T, 3>; 3] {
    let row = |i: usize| {
        let mut v = Vector::from_array([a.at([i, 0]), a.at([i, 1]), a.at([i, 2])]);
        v[i] = v[i] - lambda;
        v
    };
    [row(0), row(1), row(2)]
}

fn normalized<T: Scalar>(v: Vector<T, 3>) -> Vector<T, 3> {
    let n = v.norm();
    v.map_stored(|x| x / n)
}

/// Any unit vector orthogonal to `v`.
fn orthogonal_to<T: Scalar>(v: &Vector<T, 3>) -> Vector<T, 3> {
    let [x, y, z] = v.to_array().map(|c| c.abs());
    let axis = if x <= y && x <= z {
        0
    } else if y <= z {
        1
    } else {
        2
    };
    let mut e = Vector::zeros();
    e[axis] = T::one();
    normalized(v.cross(&e))
}

fn symmetric_eigenvectors<T: Scalar>(a: &Matrix<T, 3, 3>, lambda: &Vector<T, 3>) -> Matrix<T, 3, 3> {
    let scale = a
        .as_slice()
        .iter()
        .fold(T::zero(), |acc, &v| acc.max(v.abs()));
    let threshold = T::epsilon().sqrt() * scale * scale;

    // each eigenvector is orthogonal to every row of A - λI, so the longest
    // cross product of two rows spans the eigenspace when it is simple
    let mut found: [Option<Vector<T, 3>>; 3] = [None; 3];
    for (k, slot) in found.iter_mut().enumerate() {
        let [r0, r1, r2] = shifted_rows(a, lambda[k]);
        let best = [r0.cross(&r1), r0.cross(&r2), r1.cross(&r2)]
            .into_iter()
            .fold(Vector::zeros(), |best: Vector<T, 3>, v| {
                if v.norm() > best.norm() {
                    v
                } else {
                    best
                }
            });
        if best.norm() > threshold {
            *slot = Some(normalized(best));
        }
    }

    let missing = found.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        tracing::debug!(missing, "repeated eigenvalue, completing the eigenbasis");
    }
    let vectors = match found {
        [Some(u), Some(v), Some(w)] => [u, v, w],
        [Some(u), Some(v), None] => [u, v, normalized(u.cross(&v))],
        [Some(u), None, Some(w)] => [u, normalized(w.cross(&u)), w],
        [None, Some(v), Some(w)] => [normalized(v.cross(&w)), v, w],
        [Some(u), None, None] => {
            let v = orthogonal_to(&u);
            [u, v, u.cross(&v)]
        }
        [None, Some(v), None] => {
            let w = orthogonal_to(&v);
            [w.cross(&v), v, w]
        }
        [None, None, Some(w)] => {
            let u = orthogonal_to(&w);
            [u, w.cross(&u), w]
        }
        [None, None, None] => return Matrix::from_rows(identity_rows()),
    };

    Matrix::from_rows([0, 1, 2].map(|i| vectors.map(|v| v[i])))
}

fn identity_rows<T: Scalar>() -> [[T; 3]; 3] {
    let (o, l) = (T::zero(), T::one());
    [[l, o, o], [o, l, o], [o, o, l]]
}

/// Eigenvalues of `a`.
pub fn eigenvalues<T, const D: usize, M: Eigen<T, D>>(a: &M) -> Result<Vector<T, D>> {
    a.eigenvalues()
}

/// Eigenvectors of `a`, one per column.
pub fn eigenvectors<T, const D: usize, M: Eigen<T, D>>(a: &M) -> Result<Matrix<T, D, D>> {
    a.eigenvectors()
}
