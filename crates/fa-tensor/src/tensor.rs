use std::fmt;
use std::ops;

use crate::error::{violation, Result, TensorError};
use crate::layout::{Index, Layout};
use crate::packing::Packing;
use crate::scalar::Scalar;

/// A fixed-size tensor of order 1 or 2 with packed inline storage.
///
/// The shape is carried by the const parameters `R` (rows) and `C`
/// (columns); a tensor with a single column is a vector. The storage is an
/// inline `R x C` array whose first [`size`](Tensor::size) cells, in layout
/// order, hold the stored values of the active [`Packing`]. Cells past that
/// prefix are never read and stay zero.
#[derive(Debug, Clone, Copy)]
pub struct Tensor<T, const R: usize, const C: usize> {
    pub(crate) cells: [[T; C]; R],
    pub(crate) packing: Packing,
}

/// An order-1 tensor of length `D`.
pub type Vector<T, const D: usize> = Tensor<T, D, 1>;

/// An order-2 tensor with `R` rows and `C` columns.
pub type Matrix<T, const R: usize, const C: usize> = Tensor<T, R, C>;

impl<T: Scalar, const R: usize, const C: usize> Tensor<T, R, C> {
    /// A zero tensor of the given packing, bypassing validation.
    pub(crate) fn blank(packing: Packing) -> Self {
        Tensor {
            cells: [[T::zero(); C]; R],
            packing,
        }
    }

    /// Build a general tensor from its rows.
    pub fn from_rows(rows: [[T; C]; R]) -> Self {
        Tensor {
            cells: rows,
            packing: Packing::General,
        }
    }

    /// Build a tensor from exactly [`size`](Tensor::size) values given in
    /// layout order.
    ///
    /// # Errors
    /// Fails if the packing does not fit the shape or the number of values
    /// differs from the cell count.
    pub fn from_cells(packing: Packing, values: &[T]) -> Result<Self> {
        packing.validate(R, C)?;
        let expected = packing.cell_count(R, C);
        if values.len() != expected {
            return Err(violation(TensorError::CellCountMismatch {
                packing,
                expected,
                got: values.len(),
            }));
        }
        let mut tensor = Self::blank(packing);
        tensor.as_mut_slice().copy_from_slice(values);
        Ok(tensor)
    }

    /// `[rows, columns]`.
    pub const fn shape() -> [usize; 2] {
        [R, C]
    }

    /// Number of axes: 1 for vectors, 2 for matrices.
    pub const fn order() -> usize {
        if C == 1 {
            1
        } else {
            2
        }
    }

    /// Whether every dimension is equal. Vectors are trivially square.
    pub const fn is_square() -> bool {
        C == 1 || R == C
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    /// The stored coordinates of this tensor, in storage order.
    pub fn layout(&self) -> Layout {
        Layout::new(self.packing, R, C)
    }

    /// Number of stored cells.
    pub fn size(&self) -> usize {
        self.packing.cell_count(R, C)
    }

    /// The stored cells as a contiguous buffer, in layout order.
    pub fn as_slice(&self) -> &[T] {
        let n = self.size();
        &self.cells.as_flattened()[..n]
    }

    /// Mutable access to the stored cells.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let n = self.size();
        &mut self.cells.as_flattened_mut()[..n]
    }

    fn check_bounds(index: Index) -> Result<()> {
        let [i, j] = index;
        if i < R && j < C {
            Ok(())
        } else {
            Err(violation(TensorError::IndexOutOfBounds {
                index,
                shape: [R, C],
            }))
        }
    }

    /// Logical read; entries without a stored slot read as zero.
    ///
    /// # Errors
    /// Fails if `index` lies outside the shape.
    pub fn get(&self, index: Index) -> Result<T> {
        Self::check_bounds(index)?;
        Ok(self.at(index))
    }

    /// Logical read without the `Result` wrapper.
    ///
    /// # Panics
    /// Panics if `index` lies outside the shape.
    pub fn at(&self, index: Index) -> T {
        let [i, j] = index;
        assert!(
            i < R && j < C,
            "index {:?} out of bounds for [{}, {}]",
            index,
            R,
            C
        );
        match self.layout().offset(index) {
            Some(slot) => self.as_slice()[slot],
            None => T::zero(),
        }
    }

    /// Logical write. Writing either half of a symmetric pair updates the
    /// shared slot.
    ///
    /// # Errors
    /// Fails if `index` lies outside the shape or has no stored slot.
    pub fn set(&mut self, index: Index, value: T) -> Result<()> {
        Self::check_bounds(index)?;
        match self.layout().offset(index) {
            Some(slot) => {
                self.as_mut_slice()[slot] = value;
                Ok(())
            }
            None => Err(violation(TensorError::VirtualWrite {
                index,
                packing: self.packing,
            })),
        }
    }

    /// Re-express the logical values of `self` in `packing`.
    ///
    /// The caller guarantees `packing` is valid for the shape; values the
    /// target cannot represent are dropped.
    pub(crate) fn project(&self, packing: Packing) -> Self {
        let mut out = Self::blank(packing);
        for (slot, index) in out.layout().iter().enumerate() {
            out.as_mut_slice()[slot] = self.at(index);
        }
        out
    }

    /// Convert to another packing.
    ///
    /// # Errors
    /// Fails if the packing does not fit the shape, or if the target cannot
    /// represent the current values exactly (e.g. a matrix with non-zero
    /// off-diagonal entries repacked as diagonal).
    pub fn repack(&self, packing: Packing) -> Result<Self> {
        packing.validate(R, C)?;
        let out = self.project(packing);
        if out != *self {
            return Err(violation(TensorError::LossyRepack {
                from: self.packing,
                to: packing,
            }));
        }
        Ok(out)
    }

    /// Apply `f` to every stored cell in place.
    pub fn map_stored(mut self, f: impl Fn(T) -> T) -> Self {
        for cell in self.as_mut_slice() {
            *cell = f(*cell);
        }
        self
    }
}

impl<T: Scalar, const D: usize> Tensor<T, D, 1> {
    pub fn from_array(values: [T; D]) -> Self {
        Tensor {
            cells: values.map(|v| [v]),
            packing: Packing::General,
        }
    }

    pub fn to_array(&self) -> [T; D] {
        self.cells.map(|[v]| v)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Default for Tensor<T, R, C> {
    fn default() -> Self {
        Self::blank(Packing::General)
    }
}

/// Direct access to stored slot `n` (the raw linear coordinate).
impl<T: Scalar, const R: usize, const C: usize> ops::Index<usize> for Tensor<T, R, C> {
    type Output = T;

    fn index(&self, slot: usize) -> &T {
        &self.as_slice()[slot]
    }
}

impl<T: Scalar, const R: usize, const C: usize> ops::IndexMut<usize> for Tensor<T, R, C> {
    fn index_mut(&mut self, slot: usize) -> &mut T {
        &mut self.as_mut_slice()[slot]
    }
}

/// Exact logical comparison over the layout both packings repack into.
impl<T: Scalar, const R: usize, const C: usize> PartialEq for Tensor<T, R, C> {
    fn eq(&self, other: &Self) -> bool {
        Layout::new(self.packing.repack(other.packing), R, C)
            .iter()
            .all(|index| self.at(index) == other.at(index))
    }
}

fn write_row<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = T>,
) -> fmt::Result {
    write!(f, "[ ")?;
    for (k, v) in values.enumerate() {
        if k > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, " ]")
}

impl<T: Scalar, const R: usize, const C: usize> fmt::Display for Tensor<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if Self::order() == 1 {
            return write_row(f, (0..R).map(|i| self.at([i, 0])));
        }
        write!(f, "[ ")?;
        for i in 0..R {
            if i > 0 {
                write!(f, ",")?;
            }
            write_row(f, (0..C).map(|j| self.at([i, j])))?;
        }
        write!(f, " ]")
    }
}
