//! Batch kernels over contiguous buffers of packed 3x3 tensors.
//!
//! Each tensor occupies `cell_count` consecutive `f64` cells in the stored
//! order of its packing. A batch stops at the first tensor that fails.

use std::fmt;

use fa_linalg::{invariants, Eigen, Inverse};
use fa_tensor::{Matrix, Packing, TensorError};

/// A failure at `position` within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchError {
    pub position: usize,
    pub source: TensorError,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor {}: {}", self.position, self.source)
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

trait At<T> {
    fn at(self, position: usize) -> Result<T, BatchError>;
}

impl<T> At<T> for fa_tensor::Result<T> {
    fn at(self, position: usize) -> Result<T, BatchError> {
        self.map_err(|source| BatchError { position, source })
    }
}

fn tensors(packing: Packing, input: &[f64]) -> impl Iterator<Item = &[f64]> {
    input.chunks_exact(packing.cell_count(3, 3))
}

/// Inverts every tensor of `input` into `output`, keeping the packing.
pub fn inverse(packing: Packing, input: &[f64], output: &mut [f64]) -> Result<(), BatchError> {
    tracing::debug!(%packing, cells = input.len(), "batch inverse");
    let n = packing.cell_count(3, 3);
    for (position, (src, dst)) in tensors(packing, input)
        .zip(output.chunks_exact_mut(n))
        .enumerate()
    {
        let a = Matrix::<f64, 3, 3>::from_cells(packing, src).at(position)?;
        let inv = a.inverse().at(position)?;
        dst.copy_from_slice(inv.as_slice());
    }
    Ok(())
}

/// Principal invariants of every tensor of `input`, one entry per tensor in
/// each of `i1`, `i2` and `i3`.
pub fn invariants_of(
    packing: Packing,
    input: &[f64],
    i1: &mut [f64],
    i2: &mut [f64],
    i3: &mut [f64],
) -> Result<(), BatchError> {
    tracing::debug!(%packing, cells = input.len(), "batch invariants");
    let outputs = i1.iter_mut().zip(i2.iter_mut()).zip(i3.iter_mut());
    for (position, (src, ((o1, o2), o3))) in tensors(packing, input).zip(outputs).enumerate() {
        let a = Matrix::<f64, 3, 3>::from_cells(packing, src).at(position)?;
        let inv = invariants(&a);
        *o1 = inv.i1;
        *o2 = inv.i2;
        *o3 = inv.i3;
    }
    Ok(())
}

/// Eigenvalues of every tensor of `input`, three per tensor.
pub fn eigenvalues(packing: Packing, input: &[f64], output: &mut [f64]) -> Result<(), BatchError> {
    tracing::debug!(%packing, cells = input.len(), "batch eigenvalues");
    for (position, (src, dst)) in tensors(packing, input)
        .zip(output.chunks_exact_mut(3))
        .enumerate()
    {
        let a = Matrix::<f64, 3, 3>::from_cells(packing, src).at(position)?;
        let lambda = a.eigenvalues().at(position)?;
        dst.copy_from_slice(lambda.as_slice());
    }
    Ok(())
}
