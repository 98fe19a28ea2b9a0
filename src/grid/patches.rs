//! Lazy strided grid extraction.

use std::iter::FusedIterator;

use crate::grid::{spacing, Centre, PatchParams, Spacing};
use crate::image::{ImageShape, MaskedPatch, MaskedRaster, RasterView};
use crate::trace::{trace_event, trace_span};
use crate::util::PatchResult;

/// Row and column spacings of a patch grid over one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridLayout {
    pub(crate) pwidth: usize,
    pub(crate) psize: usize,
    pub(crate) rows: Spacing,
    pub(crate) cols: Spacing,
}

impl GridLayout {
    pub(crate) fn new(shape: ImageShape, params: PatchParams) -> PatchResult<Self> {
        params.validate()?;
        let psize = params.psize();
        let stride = params.effective_stride();
        let rows = spacing(shape.rows, psize, stride)?;
        let cols = spacing(shape.cols, psize, stride)?;
        Ok(Self {
            pwidth: params.pwidth,
            psize,
            rows,
            cols,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Top-left pixel of the patch at row-major position `index`.
    fn start(&self, index: usize) -> (usize, usize) {
        let per_row = self.cols.len();
        let row = self.rows.offset() + (index / per_row) * self.rows.stride();
        let col = self.cols.offset() + (index % per_row) * self.cols.stride();
        (row, col)
    }

    fn centre(&self, index: usize, shift: Centre) -> Centre {
        let (row, col) = self.start(index);
        Centre {
            row: row + self.pwidth + shift.row,
            col: col + self.pwidth + shift.col,
        }
    }
}

/// Lazy iterator over flattened grid patches and their centres.
///
/// Patches come in row-major order: every column offset of the first row
/// offset, then the next row offset. Each patch has
/// `psize * psize * channels` elements. Clone the iterator (or call
/// [`grid_patches`] again) to restart it.
#[derive(Clone, Debug)]
pub struct GridPatches<'a, T> {
    image: RasterView<'a, T>,
    layout: GridLayout,
    shift: Centre,
    front: usize,
    back: usize,
}

/// Builds a lazy strided grid extractor.
///
/// `pstride` is clamped to at least 1. Fails when the patch does not fit the
/// image along either axis.
pub fn grid_patches<T: Copy>(
    image: RasterView<'_, T>,
    pwidth: usize,
    pstride: usize,
) -> PatchResult<GridPatches<'_, T>> {
    let _span = trace_span!("grid_patches", rows = image.rows(), cols = image.cols()).entered();
    let layout = GridLayout::new(image.shape(), PatchParams::new(pwidth, pstride))?;
    trace_event!(
        "grid_layout",
        patch_rows = layout.rows.len(),
        patch_cols = layout.cols.len()
    );
    Ok(GridPatches {
        image,
        layout,
        shift: Centre::default(),
        front: 0,
        back: layout.len(),
    })
}

impl<'a, T> GridPatches<'a, T> {
    /// Adds `(row, col)` to every reported centre.
    ///
    /// Used to express centres of a sub-window in full-image coordinates.
    pub fn with_centre_offset(mut self, offset: impl Into<Centre>) -> Self {
        self.shift = offset.into();
        self
    }

    /// Number of patches along rows and columns.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.layout.rows.len(), self.layout.cols.len())
    }

    /// Row start offsets of the grid.
    pub fn row_spacing(&self) -> Spacing {
        self.layout.rows
    }

    /// Column start offsets of the grid.
    pub fn col_spacing(&self) -> Spacing {
        self.layout.cols
    }

    /// Length of each flattened patch.
    pub fn patch_len(&self) -> usize {
        self.layout.psize * self.layout.psize * self.image.channels()
    }

    /// Iterates the remaining centres without copying patch data.
    pub fn centres(&self) -> GridCentres {
        GridCentres {
            layout: self.layout,
            shift: self.shift,
            front: self.front,
            back: self.back,
        }
    }
}

impl<T: Copy> Iterator for GridPatches<'_, T> {
    type Item = (Vec<T>, Centre);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        let (row, col) = self.layout.start(index);
        let patch = self.image.block(row, col, self.layout.psize);
        Some((patch, self.layout.centre(index, self.shift)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Copy> ExactSizeIterator for GridPatches<'_, T> {}

impl<T: Copy> FusedIterator for GridPatches<'_, T> {}

/// Centres of a grid, in the same order as [`GridPatches`].
#[derive(Clone, Debug)]
pub struct GridCentres {
    layout: GridLayout,
    shift: Centre,
    front: usize,
    back: usize,
}

impl Iterator for GridCentres {
    type Item = Centre;

    fn next(&mut self) -> Option<Centre> {
        if self.front >= self.back {
            return None;
        }
        let centre = self.layout.centre(self.front, self.shift);
        self.front += 1;
        Some(centre)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCentres {}

/// Lazy grid extractor over data and mask.
#[derive(Clone, Debug)]
pub struct MaskedGridPatches<'a, T> {
    image: MaskedRaster<'a, T>,
    layout: GridLayout,
    shift: Centre,
    front: usize,
    back: usize,
}

/// Masked counterpart of [`grid_patches`].
pub fn grid_patches_masked<T: Copy>(
    image: MaskedRaster<'_, T>,
    pwidth: usize,
    pstride: usize,
) -> PatchResult<MaskedGridPatches<'_, T>> {
    let data = image.data();
    let _span =
        trace_span!("grid_patches_masked", rows = data.rows(), cols = data.cols()).entered();
    let layout = GridLayout::new(data.shape(), PatchParams::new(pwidth, pstride))?;
    Ok(MaskedGridPatches {
        image,
        layout,
        shift: Centre::default(),
        front: 0,
        back: layout.len(),
    })
}

impl<T> MaskedGridPatches<'_, T> {
    /// Adds `(row, col)` to every reported centre.
    pub fn with_centre_offset(mut self, offset: impl Into<Centre>) -> Self {
        self.shift = offset.into();
        self
    }

    /// Number of patches along rows and columns.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.layout.rows.len(), self.layout.cols.len())
    }
}

impl<T: Copy> Iterator for MaskedGridPatches<'_, T> {
    type Item = (MaskedPatch<T>, Centre);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        let (row, col) = self.layout.start(index);
        let psize = self.layout.psize;
        let patch = MaskedPatch {
            data: self.image.data().block(row, col, psize),
            mask: self.image.mask().block(row, col, psize),
        };
        Some((patch, self.layout.centre(index, self.shift)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Copy> ExactSizeIterator for MaskedGridPatches<'_, T> {}
