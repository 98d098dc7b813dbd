//! Elementwise arithmetic.
//!
//! Every binary operator resolves the packing of its result once, from the
//! packings of its operands, and then walks the layout of that packing.
//! Operators taking a tensor by value reuse it as the output when its packing
//! already equals the resolved one; operators taking references always build
//! a fresh tensor. Both paths produce identical values.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use half::f16;

use crate::error::{violation, Result, TensorError};
use crate::packing::Packing;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Which side of the operator an owned operand sits on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn combine<T: Scalar, const R: usize, const C: usize>(
    lhs: &Tensor<T, R, C>,
    rhs: &Tensor<T, R, C>,
    f: impl Fn(T, T) -> T,
) -> Tensor<T, R, C> {
    let mut out = Tensor::blank(lhs.packing().repack(rhs.packing()));
    for (slot, index) in out.layout().iter().enumerate() {
        out[slot] = f(lhs.at(index), rhs.at(index));
    }
    out
}

fn combine_into<T: Scalar, const R: usize, const C: usize>(
    mut owned: Tensor<T, R, C>,
    side: Side,
    other: &Tensor<T, R, C>,
    f: impl Fn(T, T) -> T,
) -> Tensor<T, R, C> {
    let packing = owned.packing().repack(other.packing());
    if packing != owned.packing() {
        tracing::trace!(%packing, "operand cannot hold the result, allocating");
        return match side {
            Side::Left => combine(&owned, other, f),
            Side::Right => combine(other, &owned, f),
        };
    }
    tracing::trace!(%packing, "reusing operand storage");
    for (slot, index) in owned.layout().iter().enumerate() {
        let (a, b) = (owned[slot], other.at(index));
        owned[slot] = match side {
            Side::Left => f(a, b),
            Side::Right => f(b, a),
        };
    }
    owned
}

fn combine_owned<T: Scalar, const R: usize, const C: usize>(
    lhs: Tensor<T, R, C>,
    rhs: Tensor<T, R, C>,
    f: impl Fn(T, T) -> T,
) -> Tensor<T, R, C> {
    if lhs.packing().absorbs(rhs.packing()) {
        combine_into(lhs, Side::Left, &rhs, f)
    } else {
        combine_into(rhs, Side::Right, &lhs, f)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $f:expr) => {
        impl<T: Scalar, const R: usize, const C: usize> $trait<&Tensor<T, R, C>>
            for &Tensor<T, R, C>
        {
            type Output = Tensor<T, R, C>;

            fn $method(self, rhs: &Tensor<T, R, C>) -> Tensor<T, R, C> {
                combine(self, rhs, $f)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $trait<&Tensor<T, R, C>>
            for Tensor<T, R, C>
        {
            type Output = Tensor<T, R, C>;

            fn $method(self, rhs: &Tensor<T, R, C>) -> Tensor<T, R, C> {
                combine_into(self, Side::Left, rhs, $f)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $trait<Tensor<T, R, C>>
            for &Tensor<T, R, C>
        {
            type Output = Tensor<T, R, C>;

            fn $method(self, rhs: Tensor<T, R, C>) -> Tensor<T, R, C> {
                combine_into(rhs, Side::Right, self, $f)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $trait<Tensor<T, R, C>>
            for Tensor<T, R, C>
        {
            type Output = Tensor<T, R, C>;

            fn $method(self, rhs: Tensor<T, R, C>) -> Tensor<T, R, C> {
                combine_owned(self, rhs, $f)
            }
        }
    };
}

impl_binary_op!(Add, add, |a, b| a + b);
impl_binary_op!(Sub, sub, |a, b| a - b);

impl<T: Scalar, const R: usize, const C: usize> AddAssign<&Tensor<T, R, C>> for Tensor<T, R, C> {
    fn add_assign(&mut self, rhs: &Tensor<T, R, C>) {
        *self = combine_into(*self, Side::Left, rhs, |a, b| a + b);
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign<&Tensor<T, R, C>> for Tensor<T, R, C> {
    fn sub_assign(&mut self, rhs: &Tensor<T, R, C>) {
        *self = combine_into(*self, Side::Left, rhs, |a, b| a - b);
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for Tensor<T, R, C> {
    type Output = Tensor<T, R, C>;

    fn neg(self) -> Tensor<T, R, C> {
        self.map_stored(|v| -v)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for &Tensor<T, R, C> {
    type Output = Tensor<T, R, C>;

    fn neg(self) -> Tensor<T, R, C> {
        let mut out = Tensor::blank(self.packing());
        for (slot, &v) in self.as_slice().iter().enumerate() {
            out[slot] = -v;
        }
        out
    }
}

impl<T: Scalar, const R: usize, const C: usize> Tensor<T, R, C> {
    /// Multiply every stored cell by `a`.
    pub fn scale(self, a: T) -> Self {
        self.map_stored(|v| v * a)
    }

    /// Divide every stored cell by `a`.
    ///
    /// # Errors
    /// Returns [`TensorError::DivisionByZero`] if `a` is zero.
    pub fn checked_div(self, a: T) -> Result<Self> {
        if a.is_zero() {
            return Err(violation(TensorError::DivisionByZero));
        }
        Ok(self.map_stored(|v| v / a))
    }

    /// Whether this tensor, taken by value, would be reused as the output of
    /// a binary operation with an operand packed as `other`.
    pub fn can_hold(&self, other: Packing) -> bool {
        self.packing().absorbs(other)
    }
}

macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {$(
        impl<const R: usize, const C: usize> Mul<$t> for Tensor<$t, R, C> {
            type Output = Tensor<$t, R, C>;

            fn mul(self, a: $t) -> Tensor<$t, R, C> {
                self.scale(a)
            }
        }

        impl<const R: usize, const C: usize> Mul<$t> for &Tensor<$t, R, C> {
            type Output = Tensor<$t, R, C>;

            fn mul(self, a: $t) -> Tensor<$t, R, C> {
                (*self).scale(a)
            }
        }

        impl<const R: usize, const C: usize> Mul<Tensor<$t, R, C>> for $t {
            type Output = Tensor<$t, R, C>;

            fn mul(self, y: Tensor<$t, R, C>) -> Tensor<$t, R, C> {
                y.scale(self)
            }
        }

        impl<const R: usize, const C: usize> Mul<&Tensor<$t, R, C>> for $t {
            type Output = Tensor<$t, R, C>;

            fn mul(self, y: &Tensor<$t, R, C>) -> Tensor<$t, R, C> {
                (*y).scale(self)
            }
        }

        /// # Panics
        /// Panics if the divisor is zero; use [`Tensor::checked_div`] to
        /// handle that case.
        impl<const R: usize, const C: usize> Div<$t> for Tensor<$t, R, C> {
            type Output = Tensor<$t, R, C>;

            fn div(self, a: $t) -> Tensor<$t, R, C> {
                match self.checked_div(a) {
                    Ok(out) => out,
                    Err(err) => panic!("{}", err),
                }
            }
        }

        impl<const R: usize, const C: usize> Div<$t> for &Tensor<$t, R, C> {
            type Output = Tensor<$t, R, C>;

            fn div(self, a: $t) -> Tensor<$t, R, C> {
                *self / a
            }
        }
    )*};
}

impl_scalar_ops!(f32, f64, f16);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{Matrix, Vector};

    fn diag(a: f64, b: f64) -> Matrix<f64, 2, 2> {
        Matrix::from_cells(Packing::Diagonal, &[a, b]).unwrap()
    }

    fn sym(a: f64, b: f64, c: f64) -> Matrix<f64, 2, 2> {
        Matrix::from_cells(Packing::Symmetric, &[a, b, c]).unwrap()
    }

    #[test]
    fn test_add_resolves_packing() {
        let g = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!((diag(1.0, 2.0) + diag(3.0, 4.0)).packing(), Packing::Diagonal);
        assert_eq!((diag(1.0, 2.0) + sym(1.0, 2.0, 3.0)).packing(), Packing::Symmetric);
        assert_eq!((sym(1.0, 2.0, 3.0) + g).packing(), Packing::General);
        assert_eq!((&g + &diag(1.0, 1.0)).packing(), Packing::General);
    }

    #[test]
    fn test_add_values_with_synthesized_entries() {
        let s = sym(1.0, 2.0, 3.0) + diag(10.0, 20.0);
        assert_eq!(s, Matrix::from_rows([[11.0, 2.0], [2.0, 23.0]]));
    }

    #[test]
    fn test_owned_and_borrowed_agree() {
        let g = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let d = diag(5.0, 6.0);
        let borrowed = &g - &d;
        assert_eq!(g - d, borrowed);
        assert_eq!(g - &d, borrowed);
        assert_eq!(&g - d, borrowed);
        // right-hand owned operand that cannot hold the result
        assert_eq!(&d - g, -borrowed);
        assert_eq!(d - g, -borrowed);
    }

    #[test]
    fn test_sub_keeps_operand_order_when_reusing_rhs() {
        let g = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let h = Matrix::from_rows([[10.0, 20.0], [30.0, 40.0]]);
        assert_eq!(&g - h, Matrix::from_rows([[-9.0, -18.0], [-27.0, -36.0]]));
    }

    #[test]
    fn test_can_hold() {
        let d = diag(1.0, 1.0);
        assert!(d.can_hold(Packing::Diagonal));
        assert!(!d.can_hold(Packing::Symmetric));
        assert!(sym(1.0, 0.0, 1.0).can_hold(Packing::Diagonal));
    }

    #[test]
    fn test_assign_ops() {
        let mut d = diag(1.0, 2.0);
        d += &diag(1.0, 1.0);
        assert_eq!(d.packing(), Packing::Diagonal);
        assert_eq!(d, diag(2.0, 3.0));
        d -= &sym(0.0, 1.0, 0.0);
        assert_eq!(d.packing(), Packing::Symmetric);
        assert_eq!(d, sym(2.0, -1.0, 3.0));
    }

    #[test]
    fn test_neg_and_scale() {
        let v = Vector::from_array([-2.0, 2.0]);
        assert_eq!(-v, Vector::from_array([2.0, -2.0]));
        assert_eq!(-&v, Vector::from_array([2.0, -2.0]));
        assert_eq!(2.0 * v, Vector::from_array([-4.0, 4.0]));
        assert_eq!(&v * 0.5, Vector::from_array([-1.0, 1.0]));
        assert_eq!((-diag(1.0, 2.0)).packing(), Packing::Diagonal);
    }

    #[test]
    fn test_checked_div() {
        let v = Vector::from_array([3.0f32, 6.0]);
        assert_eq!(v.checked_div(3.0).unwrap(), Vector::from_array([1.0, 2.0]));
        assert_eq!(v.checked_div(0.0), Err(TensorError::DivisionByZero));
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_div_by_zero_panics() {
        let _ = Vector::from_array([1.0, 2.0]) / 0.0;
    }

    #[test]
    fn test_half_precision_arithmetic() {
        let one = f16::from_f32(1.0);
        let two = f16::from_f32(2.0);
        let v = Vector::from_array([one, two]);
        assert_eq!(v + v, two * v);
        assert_eq!((v + v) / two, v);
    }
}
