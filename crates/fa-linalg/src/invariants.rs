use fa_tensor::{Matrix, Scalar};

use crate::determinant::Determinant;

/// The principal invariants of a 3x3 matrix, the coefficients of its
/// characteristic polynomial `λ³ - I1·λ² + I2·λ - I3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invariants<T> {
    pub i1: T,
    pub i2: T,
    pub i3: T,
}

impl<T: Scalar> Invariants<T> {
    pub fn of(a: &Matrix<T, 3, 3>) -> Self {
        let tr = a.trace();
        let tr_sq = (a * a).trace();
        Self {
            i1: tr,
            i2: T::cast(0.5) * (tr * tr - tr_sq),
            i3: a.determinant(),
        }
    }
}

pub fn invariants<T: Scalar>(a: &Matrix<T, 3, 3>) -> Invariants<T> {
    Invariants::of(a)
}
