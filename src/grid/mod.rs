//! Dense grid extraction over a raster.
//!
//! Two explicit modes are provided. [`grid_patches`] is lazy and strided and
//! yields flattened patches with their centres. [`dense_patches`] uses unit
//! stride and materializes a structured `(n, psize, psize, channels)` array.
//! Both enumerate patches in row-major order of their start offsets.

mod dense;
mod patches;
mod spacing;

pub use dense::{dense_patch_grid, dense_patches, dense_patches_masked};
pub use patches::{grid_patches, grid_patches_masked, GridCentres, GridPatches, MaskedGridPatches};
pub use spacing::{spacing, Spacing, SpacingIter};

use crate::util::math::patch_size;
use crate::util::{PatchError, PatchResult};

/// Patch geometry shared by grid, point and window operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatchParams {
    /// Half-width of the patch; the full side is `2 * pwidth + 1`.
    pub pwidth: usize,
    /// Pixel step between consecutive patch centres.
    pub pstride: usize,
}

impl Default for PatchParams {
    fn default() -> Self {
        Self {
            pwidth: 0,
            pstride: 1,
        }
    }
}

impl PatchParams {
    /// Creates parameters for the given half-width and stride.
    pub fn new(pwidth: usize, pstride: usize) -> Self {
        Self { pwidth, pstride }
    }

    /// Full patch side length.
    pub fn psize(&self) -> usize {
        patch_size(self.pwidth)
    }

    /// Stride clamped to at least one pixel.
    pub fn effective_stride(&self) -> usize {
        self.pstride.max(1)
    }

    /// Rejects geometries whose patch side overflows.
    ///
    /// A zero stride is accepted and treated as 1 by the extractors.
    pub fn validate(&self) -> PatchResult<()> {
        if self.pwidth > (usize::MAX - 1) / 2 {
            return Err(PatchError::InvalidParameter("pwidth is too large"));
        }
        Ok(())
    }
}

/// Centre pixel of a grid patch, in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Centre {
    pub row: usize,
    pub col: usize,
}

impl Centre {
    /// Creates a centre at `(row, col)`.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Centre {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
