use std::fmt;

use crate::error::{violation, Result, TensorError};
use crate::layout::Index;

/// Storage discipline of a tensor: which logical cells are physically stored.
///
/// - `General`: every logical cell has its own slot, row-major.
/// - `Diagonal`: only `(i, i)` is stored; every other entry reads as zero.
/// - `Symmetric`: the upper triangle `(i, j), i <= j` is stored row by row and
///   `(j, i)` aliases the same slot.
///
/// Diagonal and symmetric packings only make sense for square matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Packing {
    General,
    Diagonal,
    Symmetric,
}

impl Packing {
    /// The packing both operands of a binary operation can be repacked into
    /// without losing information.
    ///
    /// | lhs \ rhs  | General | Diagonal  | Symmetric |
    /// |------------|---------|-----------|-----------|
    /// | General    | General | General   | General   |
    /// | Diagonal   | General | Diagonal  | Symmetric |
    /// | Symmetric  | General | Symmetric | Symmetric |
    pub fn repack(self, other: Packing) -> Packing {
        match (self, other) {
            (Packing::General, _) | (_, Packing::General) => Packing::General,
            (Packing::Diagonal, Packing::Diagonal) => Packing::Diagonal,
            (Packing::Symmetric, _) | (_, Packing::Symmetric) => Packing::Symmetric,
        }
    }

    /// Whether every value representable in `other` is representable in `self`.
    pub fn absorbs(self, other: Packing) -> bool {
        self.repack(other) == self
    }

    /// Checks that this packing is usable for a `rows x cols` tensor.
    ///
    /// `cols == 1` denotes a vector, which only supports general packing.
    pub fn validate(self, rows: usize, cols: usize) -> Result<()> {
        match self {
            Packing::General => Ok(()),
            Packing::Diagonal | Packing::Symmetric if rows == cols && cols > 1 => Ok(()),
            _ => Err(violation(TensorError::InvalidPacking {
                packing: self,
                rows,
                cols,
            })),
        }
    }

    /// Number of physically stored cells for a `rows x cols` tensor.
    pub fn cell_count(self, rows: usize, cols: usize) -> usize {
        match self {
            Packing::General => rows * cols,
            Packing::Diagonal => rows,
            Packing::Symmetric => rows * (rows + 1) / 2,
        }
    }

    /// Whether `index` has its own stored slot (as opposed to being
    /// synthesized or mirrored).
    pub fn is_stored(self, index: Index) -> bool {
        let [i, j] = index;
        match self {
            Packing::General => true,
            Packing::Diagonal => i == j,
            Packing::Symmetric => i <= j,
        }
    }

    /// Storage slot backing the logical coordinate `index`.
    ///
    /// Returns `None` for diagonal off-diagonal coordinates, which have no
    /// slot at all. Symmetric lower-triangle coordinates resolve to their
    /// mirrored upper-triangle slot.
    pub fn offset(self, rows: usize, cols: usize, index: Index) -> Option<usize> {
        let [i, j] = index;
        match self {
            Packing::General => Some(i * cols + j),
            Packing::Diagonal => (i == j).then_some(i),
            Packing::Symmetric => {
                let (i, j) = if i <= j { (i, j) } else { (j, i) };
                Some(i * (2 * rows - i + 1) / 2 + (j - i))
            }
        }
    }
}

impl fmt::Display for Packing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packing::General => write!(f, "general"),
            Packing::Diagonal => write!(f, "diagonal"),
            Packing::Symmetric => write!(f, "symmetric"),
        }
    }
}
