//! `fa-linalg` - Closed-form kernels over `fa-tensor` matrices.
//!
//! Determinants up to order 4, inverses of order 2 and 3, principal
//! invariants, eigen decomposition of symmetric matrices and the matrix
//! functions built on it. Every kernel is an exact formula; none iterates.

pub mod determinant;
pub mod eigen;
pub mod function;
pub mod inverse;
pub mod invariants;

pub use determinant::{det, Determinant};
pub use eigen::{eigenvalues, eigenvectors, Eigen};
pub use function::function;
pub use inverse::{inverse, Inverse};
pub use invariants::{invariants, Invariants};

pub use fa_tensor::{Result, TensorError};
