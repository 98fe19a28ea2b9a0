//! Raster views and shape validation.
//!
//! `RasterView` is a borrowed `(rows, cols, channels)` view into a 1D buffer.
//! Channels are interleaved per pixel and the stride counts elements between
//! the starts of consecutive rows, so a stride larger than `cols * channels`
//! represents padded rows. ROI and window views are zero-copy and keep the
//! parent stride.

use crate::util::{PatchError, PatchResult};
use crate::window::Window;
use ndarray::{ArrayView, Dimension};

mod mask;

pub use mask::{MaskedPatch, MaskedPatchArray, MaskedRaster};

/// Validated image extents. `channels` is 1 for 2D images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageShape {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}

impl ImageShape {
    /// Returns the extents as a `(rows, cols, channels)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    /// Number of elements in one row of pixels.
    pub fn row_len(&self) -> usize {
        self.cols * self.channels
    }
}

/// Validates an n-dimensional array shape as an image.
///
/// Rank 2 shapes get an implicit single channel; rank 3 shapes carry their
/// channel count in the last axis. Any other rank, or a zero extent, fails.
pub fn check_image(shape: &[usize]) -> PatchResult<ImageShape> {
    let (rows, cols, channels) = match *shape {
        [rows, cols] => (rows, cols, 1),
        [rows, cols, channels] => (rows, cols, channels),
        _ => return Err(PatchError::InvalidRank { ndim: shape.len() }),
    };
    if rows == 0 || cols == 0 || channels == 0 {
        return Err(PatchError::InvalidShape {
            rows,
            cols,
            channels,
        });
    }
    Ok(ImageShape {
        rows,
        cols,
        channels,
    })
}

/// Borrowed raster view with interleaved channels and an explicit stride.
#[derive(Debug)]
pub struct RasterView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    channels: usize,
    stride: usize,
}

impl<T> Clone for RasterView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RasterView<'_, T> {}

impl<'a, T> RasterView<'a, T> {
    /// Creates a contiguous single-channel view.
    pub fn from_slice(data: &'a [T], rows: usize, cols: usize) -> PatchResult<Self> {
        Self::with_channels(data, rows, cols, 1)
    }

    /// Creates a contiguous view with `channels` interleaved values per pixel.
    pub fn with_channels(
        data: &'a [T],
        rows: usize,
        cols: usize,
        channels: usize,
    ) -> PatchResult<Self> {
        Self::new(data, rows, cols, channels, cols.saturating_mul(channels))
    }

    /// Creates a view with an explicit row stride in elements.
    pub fn new(
        data: &'a [T],
        rows: usize,
        cols: usize,
        channels: usize,
        stride: usize,
    ) -> PatchResult<Self> {
        let needed = required_len(rows, cols, channels, stride)?;
        if data.len() < needed {
            return Err(PatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            rows,
            cols,
            channels,
            stride,
        })
    }

    /// Borrows a rank 2 or rank 3 `ndarray` view in standard layout.
    pub fn from_array<D: Dimension>(array: ArrayView<'a, T, D>) -> PatchResult<Self> {
        let shape = check_image(array.shape())?;
        let data = array.to_slice().ok_or(PatchError::NonContiguous)?;
        Self::with_channels(data, shape.rows, shape.cols, shape.channels)
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the validated image extents.
    pub fn shape(&self) -> ImageShape {
        ImageShape {
            rows: self.rows,
            cols: self.cols,
            channels: self.channels,
        }
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the value at `(row, col, channel)` if it is within bounds.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<&'a T> {
        self.pixel(row, col)?.get(channel)
    }

    /// Returns all channel values of the pixel at `(row, col)`.
    pub fn pixel(&self, row: usize, col: usize) -> Option<&'a [T]> {
        if col >= self.cols {
            return None;
        }
        let row_data = self.row(row)?;
        let start = col * self.channels;
        row_data.get(start..start + self.channels)
    }

    /// Returns a contiguous slice for `row` with length `cols * channels`.
    pub fn row(&self, row: usize) -> Option<&'a [T]> {
        if row >= self.rows {
            return None;
        }
        let start = row.checked_mul(self.stride)?;
        let end = start.checked_add(self.cols * self.channels)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy view of `rows x cols` pixels starting at `(row, col)`.
    pub fn roi(
        &self,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    ) -> PatchResult<RasterView<'a, T>> {
        let out_of_bounds = PatchError::RoiOutOfBounds {
            row,
            col,
            rows,
            cols,
            img_rows: self.rows,
            img_cols: self.cols,
        };
        if rows == 0 || cols == 0 {
            return Err(PatchError::InvalidShape {
                rows,
                cols,
                channels: self.channels,
            });
        }
        let end_row = row.checked_add(rows).ok_or(out_of_bounds.clone())?;
        let end_col = col.checked_add(cols).ok_or(out_of_bounds.clone())?;
        if end_row > self.rows || end_col > self.cols {
            return Err(out_of_bounds);
        }

        let start = row * self.stride + col * self.channels;
        let data = self
            .data
            .get(start..)
            .ok_or(PatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;
        RasterView::new(data, rows, cols, self.channels, self.stride)
    }

    /// Returns the zero-copy view covered by a partition window.
    pub fn window(&self, window: &Window) -> PatchResult<RasterView<'a, T>> {
        self.roi(
            window.rows.start,
            window.cols.start,
            window.rows.len(),
            window.cols.len(),
        )
    }
}

impl<'a, T: Copy> RasterView<'a, T> {
    /// Appends the `psize x psize` block at `(row, col)` to `out` in
    /// row, column, channel order. The block must lie inside the view.
    pub(crate) fn extend_block(&self, row: usize, col: usize, psize: usize, out: &mut Vec<T>) {
        let start = col * self.channels;
        let end = start + psize * self.channels;
        for r in row..row + psize {
            let start_idx = r * self.stride;
            out.extend_from_slice(&self.data[start_idx + start..start_idx + end]);
        }
    }

    /// Copies the `psize x psize` block at `(row, col)` into a new vector.
    pub(crate) fn block(&self, row: usize, col: usize, psize: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(psize * psize * self.channels);
        self.extend_block(row, col, psize, &mut out);
        out
    }
}

fn required_len(rows: usize, cols: usize, channels: usize, stride: usize) -> PatchResult<usize> {
    if rows == 0 || cols == 0 || channels == 0 {
        return Err(PatchError::InvalidShape {
            rows,
            cols,
            channels,
        });
    }
    let row_len = cols
        .checked_mul(channels)
        .ok_or(PatchError::InvalidShape {
            rows,
            cols,
            channels,
        })?;
    if stride < row_len {
        return Err(PatchError::InvalidStride { row_len, stride });
    }
    (rows - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(PatchError::InvalidShape {
            rows,
            cols,
            channels,
        })
}

#[cfg(test)]
mod tests {
    use super::{check_image, RasterView};
    use crate::util::PatchError;

    #[test]
    fn check_image_defaults_to_single_channel() {
        let shape = check_image(&[4, 7]).unwrap();
        assert_eq!(shape.as_tuple(), (4, 7, 1));
        let shape = check_image(&[4, 7, 3]).unwrap();
        assert_eq!(shape.as_tuple(), (4, 7, 3));
        assert_eq!(shape.row_len(), 21);
    }

    #[test]
    fn check_image_rejects_bad_rank_and_empty_axes() {
        assert_eq!(
            check_image(&[5]).unwrap_err(),
            PatchError::InvalidRank { ndim: 1 }
        );
        assert_eq!(
            check_image(&[2, 2, 2, 2]).unwrap_err(),
            PatchError::InvalidRank { ndim: 4 }
        );
        assert_eq!(
            check_image(&[0, 3]).unwrap_err(),
            PatchError::InvalidShape {
                rows: 0,
                cols: 3,
                channels: 1
            }
        );
    }

    #[test]
    fn block_reads_interleaved_channels() {
        // 3x3 image, 2 channels: value = 10 * pixel + channel
        let data: Vec<u16> = (0..9).flat_map(|p| [10 * p, 10 * p + 1]).collect();
        let view = RasterView::with_channels(&data, 3, 3, 2).unwrap();
        assert_eq!(view.pixel(1, 2).unwrap(), &[50, 51]);
        assert_eq!(view.block(1, 1, 2), vec![40, 41, 50, 51, 70, 71, 80, 81]);
    }

    #[test]
    fn roi_of_roi_keeps_parent_stride() {
        let data: Vec<u8> = (0..36).collect();
        let view = RasterView::from_slice(&data, 6, 6).unwrap();
        let inner = view.roi(1, 1, 4, 4).unwrap().roi(1, 2, 2, 2).unwrap();
        assert_eq!(inner.stride(), 6);
        assert_eq!(inner.row(0).unwrap(), &[15, 16]);
        assert_eq!(inner.row(1).unwrap(), &[21, 22]);
    }
}
