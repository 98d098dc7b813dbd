//! `fa-tensor` - Fixed-dimension packed tensors.
//!
//! This crate provides:
//! - A `Tensor` value type of order 1 or 2 whose dimensions are const
//!   generics and whose storage lives inline
//! - Three storage packings (general, diagonal, symmetric) and the rule
//!   deciding the packing of a binary operation's result
//! - Layouts enumerating the stored coordinates of a packing
//! - Elementwise arithmetic that reuses an owned operand when it can hold
//!   the result
//! - Factories for zero, one, identity and basis tensors
//! - Transposition, trace, symmetric/skew parts and the vector/matrix products
//! - Exact and tolerance-based comparisons

pub mod arith;
pub mod compare;
pub mod error;
pub mod factories;
pub mod layout;
pub mod packing;
pub mod scalar;
pub mod structure;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use compare::{is_equal, is_equal_tensor, is_zero, is_zero_abs};
pub use error::{Result, TensorError};
pub use layout::{Index, Layout, LayoutIter};
pub use packing::Packing;
pub use scalar::Scalar;
pub use tensor::{Matrix, Tensor, Vector};
