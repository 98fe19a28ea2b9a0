//! Patch extraction centred on explicit pixel locations.
//!
//! All points are bounds-checked before any patch is produced; one point too
//! close to the border fails the whole request. Output order always equals
//! input order.

mod locate;

pub use locate::{located_patches, AffineLocator, LocatedPatches, LocatedPoints, PixelLocator};

use std::iter::FusedIterator;
use std::slice;

use ndarray::Array4;

use crate::grid::PatchParams;
use crate::image::{ImageShape, MaskedPatch, MaskedPatchArray, MaskedRaster, RasterView};
use crate::trace::{trace_event, trace_span};
use crate::util::{PatchError, PatchResult};

/// Checks that every `(row, col)` centre leaves room for a full patch.
///
/// Valid centres satisfy `pwidth <= row <= rows - pwidth - 1` and the same
/// for columns. Reports the first offending point by index.
pub fn check_points(
    shape: ImageShape,
    pwidth: usize,
    points: &[(usize, usize)],
) -> PatchResult<()> {
    let fits = |centre: usize, extent: usize| {
        centre >= pwidth
            && centre
                .checked_add(pwidth)
                .is_some_and(|last| last < extent)
    };
    for (index, &(row, col)) in points.iter().enumerate() {
        if !fits(row, shape.rows) || !fits(col, shape.cols) {
            return Err(PatchError::PointOutOfBounds {
                index,
                row,
                col,
                rows: shape.rows,
                cols: shape.cols,
                pwidth,
            });
        }
    }
    Ok(())
}

fn validated_psize(
    shape: ImageShape,
    pwidth: usize,
    points: &[(usize, usize)],
) -> PatchResult<usize> {
    let params = PatchParams::new(pwidth, 1);
    params.validate()?;
    check_points(shape, pwidth, points)?;
    Ok(params.psize())
}

/// Lazy iterator over flattened patches centred on the given points.
#[derive(Clone, Debug)]
pub struct PointPatches<'a, 'p, T> {
    image: RasterView<'a, T>,
    points: slice::Iter<'p, (usize, usize)>,
    pwidth: usize,
    psize: usize,
}

/// Builds a lazy extractor yielding one flattened patch per point.
///
/// Each patch covers `row - pwidth ..= row + pwidth` and the same column
/// range, flattened to `psize * psize * channels` values.
pub fn point_patches<'a, 'p, T: Copy>(
    image: RasterView<'a, T>,
    pwidth: usize,
    points: &'p [(usize, usize)],
) -> PatchResult<PointPatches<'a, 'p, T>> {
    let _span = trace_span!("point_patches", points = points.len()).entered();
    let psize = validated_psize(image.shape(), pwidth, points)?;
    Ok(PointPatches {
        image,
        points: points.iter(),
        pwidth,
        psize,
    })
}

impl<T: Copy> Iterator for PointPatches<'_, '_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        let &(row, col) = self.points.next()?;
        Some(self.image.block(row - self.pwidth, col - self.pwidth, self.psize))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl<T: Copy> ExactSizeIterator for PointPatches<'_, '_, T> {}

impl<T: Copy> FusedIterator for PointPatches<'_, '_, T> {}

/// Extracts structured patches, shape `(points.len(), psize, psize, channels)`.
pub fn point_patch_block<T: Copy>(
    image: RasterView<'_, T>,
    pwidth: usize,
    points: &[(usize, usize)],
) -> PatchResult<Array4<T>> {
    let _span = trace_span!("point_patch_block", points = points.len()).entered();
    let psize = validated_psize(image.shape(), pwidth, points)?;
    let channels = image.channels();
    let mut data = Vec::with_capacity(points.len() * psize * psize * channels);
    for &(row, col) in points {
        image.extend_block(row - pwidth, col - pwidth, psize, &mut data);
    }
    trace_event!("point_patch_block_done", values = data.len());
    Array4::from_shape_vec((points.len(), psize, psize, channels), data).map_err(|_| {
        PatchError::InvalidShape {
            rows: image.rows(),
            cols: image.cols(),
            channels,
        }
    })
}

/// Lazy point extractor over data and mask.
#[derive(Clone, Debug)]
pub struct MaskedPointPatches<'a, 'p, T> {
    image: MaskedRaster<'a, T>,
    points: slice::Iter<'p, (usize, usize)>,
    pwidth: usize,
    psize: usize,
}

/// Masked counterpart of [`point_patches`].
pub fn point_patches_masked<'a, 'p, T: Copy>(
    image: MaskedRaster<'a, T>,
    pwidth: usize,
    points: &'p [(usize, usize)],
) -> PatchResult<MaskedPointPatches<'a, 'p, T>> {
    let psize = validated_psize(image.data().shape(), pwidth, points)?;
    Ok(MaskedPointPatches {
        image,
        points: points.iter(),
        pwidth,
        psize,
    })
}

impl<T: Copy> Iterator for MaskedPointPatches<'_, '_, T> {
    type Item = MaskedPatch<T>;

    fn next(&mut self) -> Option<MaskedPatch<T>> {
        let &(row, col) = self.points.next()?;
        let (top, left) = (row - self.pwidth, col - self.pwidth);
        Some(MaskedPatch {
            data: self.image.data().block(top, left, self.psize),
            mask: self.image.mask().block(top, left, self.psize),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl<T: Copy> ExactSizeIterator for MaskedPointPatches<'_, '_, T> {}

/// Masked counterpart of [`point_patch_block`].
pub fn point_patch_block_masked<T: Copy>(
    image: MaskedRaster<'_, T>,
    pwidth: usize,
    points: &[(usize, usize)],
) -> PatchResult<MaskedPatchArray<T>> {
    let data = point_patch_block(image.data(), pwidth, points)?;
    let mask = point_patch_block(image.mask(), pwidth, points)?;
    Ok(MaskedPatchArray { data, mask })
}
