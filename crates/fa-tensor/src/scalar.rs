use std::fmt;

use half::f16;
use num_traits::Float;

/// Element types a [`crate::Tensor`] can hold.
///
/// On top of `num_traits::Float` a scalar knows the width of one
/// representable step on either side of a value, which is what the
/// tolerance comparisons in [`crate::compare`] are built on.
pub trait Scalar: Float + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Distance between `self` and the next representable value above it.
    fn ulp_right(self) -> Self;

    /// Distance between `self` and the next representable value below it.
    fn ulp_left(self) -> Self;

    /// Convert an `f64` literal into this type, rounding if needed.
    fn cast(value: f64) -> Self;

    /// Widen to `f64`, used for diagnostics.
    fn widen(self) -> f64;
}

macro_rules! impl_scalar {
    ($t:ty, $bits:ty, $from:expr, $to:expr) => {
        impl Scalar for $t {
            fn ulp_right(self) -> Self {
                next_up_bits::<$t, $bits>(self) - self
            }

            fn ulp_left(self) -> Self {
                self - (-next_up_bits::<$t, $bits>(-self))
            }

            fn cast(value: f64) -> Self {
                $from(value)
            }

            fn widen(self) -> f64 {
                $to(self)
            }
        }
    };
}

/// Bit-level access shared by the IEEE types implementing [`Scalar`].
trait Bits<B>: Float {
    fn bits(self) -> B;
    fn with_bits(bits: B) -> Self;
}

impl Bits<u32> for f32 {
    fn bits(self) -> u32 {
        self.to_bits()
    }
    fn with_bits(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

impl Bits<u64> for f64 {
    fn bits(self) -> u64 {
        self.to_bits()
    }
    fn with_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

impl Bits<u16> for f16 {
    fn bits(self) -> u16 {
        self.to_bits()
    }
    fn with_bits(bits: u16) -> Self {
        f16::from_bits(bits)
    }
}

fn next_up_bits<F, B>(x: F) -> F
where
    F: Bits<B>,
    B: num_traits::PrimInt,
{
    if x.is_nan() || x == F::infinity() {
        return x;
    }
    if x.is_zero() {
        // smallest positive subnormal
        return F::with_bits(B::one());
    }
    let bits = x.bits();
    if x > F::zero() {
        F::with_bits(bits + B::one())
    } else {
        F::with_bits(bits - B::one())
    }
}

impl_scalar!(f32, u32, |v: f64| v as f32, |v: f32| v as f64);
impl_scalar!(f64, u64, |v: f64| v, |v: f64| v);
impl_scalar!(f16, u16, f16::from_f64, f16::to_f64);
