use fa_tensor::{Packing, TensorError};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FAStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorSingular = 2,
    ErrorUnsupported = 3,
    ErrorInternal = 4,
}

impl From<&TensorError> for FAStatus {
    fn from(err: &TensorError) -> Self {
        match err {
            TensorError::Singular { .. } | TensorError::DivisionByZero => FAStatus::ErrorSingular,
            TensorError::UnsupportedPacking { .. } => FAStatus::ErrorUnsupported,
            TensorError::VirtualWrite { .. }
            | TensorError::IndexOutOfBounds { .. }
            | TensorError::InvalidPacking { .. }
            | TensorError::CellCountMismatch { .. }
            | TensorError::LossyRepack { .. } => FAStatus::ErrorInvalidArgument,
        }
    }
}

/// Storage packing of each 3x3 tensor in a batch buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FAPacking {
    /// 9 cells per tensor, row-major.
    General = 0,
    /// 3 cells per tensor, the diagonal.
    Diagonal = 1,
    /// 6 cells per tensor, the upper triangle row by row.
    Symmetric = 2,
}

impl From<FAPacking> for Packing {
    fn from(p: FAPacking) -> Self {
        match p {
            FAPacking::General => Packing::General,
            FAPacking::Diagonal => Packing::Diagonal,
            FAPacking::Symmetric => Packing::Symmetric,
        }
    }
}

impl FAPacking {
    /// Number of stored cells per 3x3 tensor.
    pub fn cells(self) -> usize {
        Packing::from(self).cell_count(3, 3)
    }
}

/// Layout of a batch buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FABatchParams {
    pub packing: FAPacking,
    /// Number of tensors in the buffer.
    pub count: usize,
}

impl Default for FABatchParams {
    fn default() -> Self {
        Self {
            packing: FAPacking::General,
            count: 1,
        }
    }
}

impl FABatchParams {
    /// Total number of `f64` cells the input buffer holds, or `None` on
    /// overflow.
    pub fn input_len(&self) -> Option<usize> {
        self.count.checked_mul(self.packing.cells())
    }
}
