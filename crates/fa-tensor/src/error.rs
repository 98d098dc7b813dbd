use thiserror::Error;

use crate::layout::Index;
use crate::packing::Packing;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("matrix is singular (determinant {determinant})")]
    Singular { determinant: f64 },
    #[error("cannot write {index:?}: no stored slot in a {packing} tensor")]
    VirtualWrite { index: Index, packing: Packing },
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Index, shape: [usize; 2] },
    #[error("{packing} packing is not valid for a {rows}x{cols} tensor")]
    InvalidPacking {
        packing: Packing,
        rows: usize,
        cols: usize,
    },
    #[error("{packing} tensor holds {expected} cells, got {got}")]
    CellCountMismatch {
        packing: Packing,
        expected: usize,
        got: usize,
    },
    #[error("repacking {from} as {to} would drop stored values")]
    LossyRepack { from: Packing, to: Packing },
    #[error("{op} is not defined for {packing} matrices")]
    UnsupportedPacking { op: &'static str, packing: Packing },
}

pub type Result<T> = std::result::Result<T, TensorError>;

/// Report a precondition violation and hand the error back to the caller.
pub fn violation(err: TensorError) -> TensorError {
    tracing::warn!(error = %err, "precondition violated");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TensorError::VirtualWrite {
            index: [0, 1],
            packing: Packing::Diagonal,
        };
        assert_eq!(
            err.to_string(),
            "cannot write [0, 1]: no stored slot in a diagonal tensor"
        );

        let err = TensorError::InvalidPacking {
            packing: Packing::Symmetric,
            rows: 2,
            cols: 3,
        };
        assert_eq!(
            err.to_string(),
            "symmetric packing is not valid for a 2x3 tensor"
        );
    }

    #[test]
    fn test_violation_passes_error_through() {
        let err = violation(TensorError::DivisionByZero);
        assert_eq!(err, TensorError::DivisionByZero);
    }
}
