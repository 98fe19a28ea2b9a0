//! Patch start offsets along one image axis.
//!
//! Offsets start at half of the leftover `(dimension - psize) % stride`, so
//! unused pixels are split between both ends of the axis instead of all
//! landing at the far edge.

use crate::util::{PatchError, PatchResult};
use std::iter::StepBy;
use std::ops::Range;

/// Iterator over the offsets of a [`Spacing`].
pub type SpacingIter = StepBy<Range<usize>>;

/// Ordered, non-empty sequence of patch start offsets along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spacing {
    offset: usize,
    stride: usize,
    len: usize,
}

/// Computes patch start offsets for an axis of length `dimension`.
///
/// Requires `dimension >= psize >= 1` and `stride >= 1`.
pub fn spacing(dimension: usize, psize: usize, stride: usize) -> PatchResult<Spacing> {
    if psize == 0 {
        return Err(PatchError::InvalidParameter("patch size must be at least 1"));
    }
    if stride == 0 {
        return Err(PatchError::InvalidParameter("stride must be at least 1"));
    }
    if psize > dimension {
        return Err(PatchError::PatchTooLarge { dimension, psize });
    }
    let span = dimension - psize;
    let offset = (span % stride) / 2;
    let len = (span - offset) / stride + 1;
    Ok(Spacing {
        offset,
        stride,
        len,
    })
}

impl Spacing {
    /// First offset; also the leading leftover margin.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Step between consecutive offsets.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of offsets (at least 1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest offset in the sequence.
    pub fn last(&self) -> usize {
        self.offset + (self.len - 1) * self.stride
    }

    /// Returns the offset at `index`.
    pub fn get(&self, index: usize) -> Option<usize> {
        (index < self.len).then(|| self.offset + index * self.stride)
    }

    /// Iterates the offsets in increasing order.
    pub fn iter(&self) -> SpacingIter {
        (self.offset..self.last() + 1).step_by(self.stride)
    }

    /// Collects the offsets into a vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl IntoIterator for Spacing {
    type Item = usize;
    type IntoIter = SpacingIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &Spacing {
    type Item = usize;
    type IntoIter = SpacingIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
