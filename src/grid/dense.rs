//! Eager unit-stride extraction into structured arrays.

use ndarray::{Array4, Array5};

use crate::grid::patches::GridLayout;
use crate::grid::PatchParams;
use crate::image::{MaskedPatchArray, MaskedRaster, RasterView};
use crate::trace::{trace_event, trace_span};
use crate::util::{PatchError, PatchResult};

/// Copies every patch of the unit-stride layout, row-major, into one buffer.
fn gather<T: Copy>(image: RasterView<'_, T>, layout: &GridLayout) -> Vec<T> {
    let psize = layout.psize;
    let mut out = Vec::with_capacity(layout.len() * psize * psize * image.channels());
    for row in layout.rows {
        for col in layout.cols {
            image.extend_block(row, col, psize, &mut out);
        }
    }
    out
}

fn unit_layout<T>(image: RasterView<'_, T>, pwidth: usize) -> PatchResult<GridLayout> {
    GridLayout::new(image.shape(), PatchParams::new(pwidth, 1))
}

fn shape_error<T>(image: RasterView<'_, T>) -> PatchError {
    let shape = image.shape();
    PatchError::InvalidShape {
        rows: shape.rows,
        cols: shape.cols,
        channels: shape.channels,
    }
}

/// Extracts every `psize x psize` patch at unit stride.
///
/// Returns shape `(n, psize, psize, channels)` with
/// `n = (rows - psize + 1) * (cols - psize + 1)`; the leading axis follows
/// the same row-major order as [`grid_patches`](crate::grid::grid_patches).
pub fn dense_patches<T: Copy>(image: RasterView<'_, T>, pwidth: usize) -> PatchResult<Array4<T>> {
    let _span = trace_span!("dense_patches", rows = image.rows(), cols = image.cols()).entered();
    let layout = unit_layout(image, pwidth)?;
    let data = gather(image, &layout);
    trace_event!("dense_patches_done", patches = layout.len());
    let psize = layout.psize;
    Array4::from_shape_vec((layout.len(), psize, psize, image.channels()), data)
        .map_err(|_| shape_error(image))
}

/// Like [`dense_patches`] but keeps the grid axes separate.
///
/// Returns shape `(patch_rows, patch_cols, psize, psize, channels)`.
pub fn dense_patch_grid<T: Copy>(
    image: RasterView<'_, T>,
    pwidth: usize,
) -> PatchResult<Array5<T>> {
    let layout = unit_layout(image, pwidth)?;
    let data = gather(image, &layout);
    let psize = layout.psize;
    let shape = (
        layout.rows.len(),
        layout.cols.len(),
        psize,
        psize,
        image.channels(),
    );
    Array5::from_shape_vec(shape, data).map_err(|_| shape_error(image))
}

/// Masked counterpart of [`dense_patches`].
pub fn dense_patches_masked<T: Copy>(
    image: MaskedRaster<'_, T>,
    pwidth: usize,
) -> PatchResult<MaskedPatchArray<T>> {
    let data = dense_patches(image.data(), pwidth)?;
    let mask = dense_patches(image.mask(), pwidth)?;
    Ok(MaskedPatchArray { data, mask })
}
