//! Data paired with a per-pixel validity mask.
//!
//! Mask values follow the masked-array convention: `true` marks an invalid
//! (missing, nodata) element. Extraction runs the same index arithmetic over
//! the data view and the mask view.

use crate::image::RasterView;
use crate::util::{PatchError, PatchResult};
use crate::window::Window;
use ndarray::Array4;

/// Raster view and its same-shape validity mask.
#[derive(Debug)]
pub struct MaskedRaster<'a, T> {
    data: RasterView<'a, T>,
    mask: RasterView<'a, bool>,
}

impl<T> Clone for MaskedRaster<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MaskedRaster<'_, T> {}

impl<'a, T> MaskedRaster<'a, T> {
    /// Pairs a data view with its mask; both must have identical extents.
    pub fn new(data: RasterView<'a, T>, mask: RasterView<'a, bool>) -> PatchResult<Self> {
        if data.shape() != mask.shape() {
            return Err(PatchError::MaskMismatch {
                data: data.shape().as_tuple(),
                mask: mask.shape().as_tuple(),
            });
        }
        Ok(Self { data, mask })
    }

    /// Returns the data view.
    pub fn data(&self) -> RasterView<'a, T> {
        self.data
    }

    /// Returns the mask view.
    pub fn mask(&self) -> RasterView<'a, bool> {
        self.mask
    }

    /// Returns the masked view covered by a partition window.
    pub fn window(&self, window: &Window) -> PatchResult<MaskedRaster<'a, T>> {
        Ok(Self {
            data: self.data.window(window)?,
            mask: self.mask.window(window)?,
        })
    }
}

/// Flattened patch with its flattened mask.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedPatch<T> {
    pub data: Vec<T>,
    pub mask: Vec<bool>,
}

impl<T> MaskedPatch<T> {
    /// Number of elements not flagged as invalid.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&invalid| !invalid).count()
    }

    /// True when every element of the patch is flagged invalid.
    pub fn is_fully_masked(&self) -> bool {
        self.mask.iter().all(|&invalid| invalid)
    }
}

/// Structured patch block `(n, psize, psize, channels)` with its mask.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedPatchArray<T> {
    pub data: Array4<T>,
    pub mask: Array4<bool>,
}

impl<T> MaskedPatchArray<T> {
    /// Number of patches along the leading axis.
    pub fn len(&self) -> usize {
        self.data.shape()[0]
    }

    /// True when the array holds no patches.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
