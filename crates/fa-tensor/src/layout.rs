use crate::packing::Packing;

/// A logical coordinate `[row, column]`. Vectors use column `0`.
pub type Index = [usize; 2];

/// The ordered set of stored coordinates of a packed `rows x cols` tensor.
///
/// Iterating a layout visits each stored slot exactly once, in storage
/// order, so the `n`-th coordinate yielded lives in slot `n`. A layout is a
/// plain value: iterating it again restarts from the first slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    packing: Packing,
    rows: usize,
    cols: usize,
}

impl Layout {
    pub fn new(packing: Packing, rows: usize, cols: usize) -> Self {
        Layout {
            packing,
            rows,
            cols,
        }
    }

    pub fn packing(&self) -> Packing {
        self.packing
    }

    /// Number of stored coordinates.
    pub fn len(&self) -> usize {
        self.packing.cell_count(self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage slot of `index`, see [`Packing::offset`].
    pub fn offset(&self, index: Index) -> Option<usize> {
        self.packing.offset(self.rows, self.cols, index)
    }

    pub fn iter(&self) -> LayoutIter {
        LayoutIter {
            layout: *self,
            next: [0, 0],
            remaining: self.len(),
        }
    }
}

impl IntoIterator for Layout {
    type Item = Index;
    type IntoIter = LayoutIter;

    fn into_iter(self) -> LayoutIter {
        self.iter()
    }
}

impl IntoIterator for &Layout {
    type Item = Index;
    type IntoIter = LayoutIter;

    fn into_iter(self) -> LayoutIter {
        self.iter()
    }
}

/// Iterator over the stored coordinates of a [`Layout`].
#[derive(Debug, Clone)]
pub struct LayoutIter {
    layout: Layout,
    next: Index,
    remaining: usize,
}

impl Iterator for LayoutIter {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        let [i, j] = current;
        let Layout { packing, cols, .. } = self.layout;
        self.next = match packing {
            Packing::General if j + 1 < cols => [i, j + 1],
            Packing::General => [i + 1, 0],
            Packing::Diagonal => [i + 1, i + 1],
            // next row restarts on the diagonal
            Packing::Symmetric if j + 1 < cols => [i, j + 1],
            Packing::Symmetric => [i + 1, i + 1],
        };
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for LayoutIter {}
