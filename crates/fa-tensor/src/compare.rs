//! Tolerance-aware comparisons.
//!
//! `==` on tensors is exact. The functions here accept a value as equal to a
//! reference when it lies strictly within one representable step of it, and
//! the `approx` impls give tests a relative/absolute tolerance to work with.

use approx::{AbsDiffEq, RelativeEq};

use crate::layout::Layout;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// `rhs - ulp_left(rhs) < lhs < rhs + ulp_right(rhs)`.
pub fn is_equal<T: Scalar>(lhs: T, rhs: T) -> bool {
    lhs < rhs + rhs.ulp_right() && lhs > rhs - rhs.ulp_left()
}

/// Componentwise [`is_equal`] over every logical entry either tensor stores.
pub fn is_equal_tensor<T: Scalar, const R: usize, const C: usize>(
    lhs: &Tensor<T, R, C>,
    rhs: &Tensor<T, R, C>,
) -> bool {
    Layout::new(lhs.packing().repack(rhs.packing()), R, C)
        .iter()
        .all(|index| is_equal(lhs.at(index), rhs.at(index)))
}

/// Whether every stored component is `<= tolerance`.
///
/// This is deliberately one-sided: large negative components pass. Use
/// [`is_zero_abs`] for the magnitude test.
pub fn is_zero<T: Scalar, const R: usize, const C: usize>(
    tensor: &Tensor<T, R, C>,
    tolerance: T,
) -> bool {
    tensor.as_slice().iter().all(|&v| v <= tolerance)
}

/// Whether every stored component has magnitude `<= tolerance`.
pub fn is_zero_abs<T: Scalar, const R: usize, const C: usize>(
    tensor: &Tensor<T, R, C>,
    tolerance: T,
) -> bool {
    tensor.as_slice().iter().all(|&v| v.abs() <= tolerance)
}

impl<T, const R: usize, const C: usize> AbsDiffEq for Tensor<T, R, C>
where
    T: Scalar + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        Layout::new(self.packing().repack(other.packing()), R, C)
            .iter()
            .all(|index| self.at(index).abs_diff_eq(&other.at(index), epsilon))
    }
}

impl<T, const R: usize, const C: usize> RelativeEq for Tensor<T, R, C>
where
    T: Scalar + RelativeEq<Epsilon = T>,
{
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        Layout::new(self.packing().repack(other.packing()), R, C)
            .iter()
            .all(|index| {
                self.at(index)
                    .relative_eq(&other.at(index), epsilon, max_relative)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Packing;
    use crate::tensor::{Matrix, Vector};
    use approx::assert_relative_eq;

    #[test]
    fn test_is_equal_reflexive() {
        for x in [0.0, -0.0, 1.0, -2.5, 1e-300, 1e300, f64::MIN_POSITIVE] {
            assert!(is_equal(x, x));
        }
        assert!(is_equal(0.0f32, -0.0f32));
    }

    #[test]
    fn test_is_equal_rejects_one_step_away() {
        let x = 1.0f64;
        assert!(!is_equal(x + x.ulp_right(), x));
        assert!(!is_equal(x - x.ulp_left(), x));
        assert!(!is_equal(1.0, 1.1));
    }

    #[test]
    fn test_is_equal_non_finite() {
        assert!(!is_equal(f64::NAN, f64::NAN));
        assert!(!is_equal(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_is_equal_tensor() {
        let a = Matrix::from_rows([[1.0, 0.0], [0.0, 1.0]]);
        let b = Matrix::<f64, 2, 2>::from_cells(Packing::Diagonal, &[1.0, 1.0]).unwrap();
        assert!(is_equal_tensor(&a, &b));
        let c = Matrix::from_rows([[1.0, 1e-9], [0.0, 1.0]]);
        assert!(!is_equal_tensor(&c, &b));
    }

    #[test]
    fn test_is_zero_one_sided() {
        let v = Vector::from_array([-5.0, 0.0]);
        assert!(is_zero(&v, 0.0));
        assert!(!is_zero_abs(&v, 0.0));

        let w = Vector::from_array([1e-12, 0.0]);
        assert!(!is_zero(&w, 0.0));
        assert!(is_zero(&w, 1e-9));
        assert!(is_zero_abs(&w, 1e-9));
    }

    #[test]
    fn test_approx_across_packings() {
        let a = Matrix::from_rows([[2.0, 1e-17], [0.0, 3.0]]);
        let b = Matrix::<f64, 2, 2>::from_cells(Packing::Diagonal, &[2.0, 3.0]).unwrap();
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }
}
