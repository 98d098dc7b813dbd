use crate::error::{violation, Result, TensorError};
use crate::layout::Index;
use crate::packing::Packing;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

impl<T: Scalar, const R: usize, const C: usize> Tensor<T, R, C> {
    /// Every stored slot of a `packing` tensor set to `value`.
    ///
    /// # Errors
    /// Fails if the packing does not fit the shape.
    pub fn filled(packing: Packing, value: T) -> Result<Self> {
        packing.validate(R, C)?;
        Ok(Self::blank(packing).map_stored(|_| value))
    }

    /// The general zero tensor. Use `zeros_packed(Packing::Diagonal)` for a
    /// zero that keeps diagonal sums diagonal.
    pub fn zeros() -> Self {
        Self::blank(Packing::General)
    }

    /// The zero tensor in the given packing.
    pub fn zeros_packed(packing: Packing) -> Result<Self> {
        Self::filled(packing, T::zero())
    }

    /// The general tensor with every entry equal to one.
    pub fn ones() -> Self {
        Self::blank(Packing::General).map_stored(|_| T::one())
    }

    /// Packing chosen for the basis element at `index`: diagonal when the
    /// coordinate sits on the diagonal of a square matrix, general otherwise.
    pub fn basis_packing(index: Index) -> Packing {
        let [i, j] = index;
        if Self::order() == 2 && R == C && i == j {
            Packing::Diagonal
        } else {
            Packing::General
        }
    }

    /// The Kronecker-delta tensor with a one at `index` and zeros elsewhere.
    ///
    /// # Errors
    /// Fails if `index` lies outside the shape.
    pub fn basis_element(index: Index) -> Result<Self> {
        let [i, j] = index;
        if i >= R || j >= C {
            return Err(violation(TensorError::IndexOutOfBounds {
                index,
                shape: [R, C],
            }));
        }
        let mut out = Self::blank(Self::basis_packing(index));
        out.set(index, T::one())?;
        Ok(out)
    }

    /// All basis elements in row-major order of their coordinate.
    pub fn basis() -> impl Iterator<Item = Self> {
        (0..R).flat_map(|i| (0..C).map(move |j| [i, j])).map(|index| {
            let mut out = Self::blank(Self::basis_packing(index));
            let slot = out.layout().offset(index).unwrap_or_default();
            out[slot] = T::one();
            out
        })
    }
}

impl<T: Scalar, const D: usize> Tensor<T, D, 1> {
    /// The `i`-th canonical basis vector.
    ///
    /// # Errors
    /// Fails if `i >= D`.
    pub fn unit(i: usize) -> Result<Self> {
        Self::basis_element([i, 0])
    }
}

impl<T: Scalar, const D: usize> Tensor<T, D, D> {
    /// The diagonal identity matrix.
    pub fn identity() -> Self {
        // a 1x1 matrix is indistinguishable from a vector and stays general
        let packing = if D > 1 {
            Packing::Diagonal
        } else {
            Packing::General
        };
        let mut out = Self::blank(packing);
        for i in 0..D {
            let slot = out.layout().offset([i, i]).unwrap_or(i);
            out[slot] = T::one();
        }
        out
    }
}
