//! Partitioning of grid extraction into rectangular sub-windows.
//!
//! Windows are cut from the whole-image spacing, not from equal pixel
//! blocks. Each window starts at a global patch offset and ends one patch
//! past its last offset, so grid extraction inside a window (with the same
//! `pwidth` and `pstride`) lands on exactly the offsets the whole-image
//! extraction would use there.

use std::ops::Range;

use crate::grid::{grid_patches, spacing, Centre, GridPatches, PatchParams, Spacing};
use crate::image::RasterView;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::math::{nearest_square_side, split_ranges};
use crate::util::{PatchError, PatchResult};

/// Half-open row and column ranges of a sub-window.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Window {
    /// Top-left pixel of the window in full-image coordinates.
    pub fn origin(&self) -> Centre {
        Centre::new(self.rows.start, self.cols.start)
    }

    /// Window extent as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }
}

/// Offsets of one chunk of a spacing, as a window range.
fn chunk_range(spacing: &Spacing, chunk: &Range<usize>, psize: usize) -> Option<Range<usize>> {
    if chunk.is_empty() {
        return None;
    }
    let first = spacing.get(chunk.start)?;
    let last = spacing.get(chunk.end - 1)?;
    Some(first..last + psize)
}

fn axis_ranges(spacing: &Spacing, npside: usize, psize: usize) -> Vec<Range<usize>> {
    split_ranges(spacing.len(), npside)
        .iter()
        .filter_map(|chunk| chunk_range(spacing, chunk, psize))
        .collect()
}

/// Splits a `rows x cols` image into about `n_windows` sub-windows.
///
/// The nearest square `round(sqrt(n_windows))` is used on both axes. Each
/// axis spacing is split into that many near-equal runs of offsets; empty
/// runs are dropped, so fewer windows come back when an axis has fewer
/// offsets than splits. Windows are ordered row-major.
pub fn image_windows(
    rows: usize,
    cols: usize,
    n_windows: usize,
    pwidth: usize,
    pstride: usize,
) -> PatchResult<Vec<Window>> {
    let _span = trace_span!("image_windows", rows = rows, cols = cols, n_windows = n_windows)
        .entered();
    let npside = nearest_square_side(n_windows);
    if npside == 0 {
        return Err(PatchError::InvalidParameter("n_windows must be at least 1"));
    }
    let params = PatchParams::new(pwidth, pstride);
    params.validate()?;
    let psize = params.psize();
    let stride = params.effective_stride();

    let row_ranges = axis_ranges(&spacing(rows, psize, stride)?, npside, psize);
    let col_ranges = axis_ranges(&spacing(cols, psize, stride)?, npside, psize);

    let mut windows = Vec::with_capacity(row_ranges.len() * col_ranges.len());
    for row_range in &row_ranges {
        for col_range in &col_ranges {
            trace_debug!(
                "window",
                row_start = row_range.start,
                row_end = row_range.end,
                col_start = col_range.start,
                col_end = col_range.end
            );
            windows.push(Window {
                rows: row_range.clone(),
                cols: col_range.clone(),
            });
        }
    }
    trace_event!("image_windows_done", windows = windows.len());
    Ok(windows)
}

/// Grid extraction restricted to one window, with full-image centres.
pub fn window_patches<'a, T: Copy>(
    image: RasterView<'a, T>,
    window: &Window,
    pwidth: usize,
    pstride: usize,
) -> PatchResult<GridPatches<'a, T>> {
    let view = image.window(window)?;
    Ok(grid_patches(view, pwidth, pstride)?.with_centre_offset(window.origin()))
}

#[cfg(test)]
mod tests {
    use super::{image_windows, Window};
    use crate::util::PatchError;

    #[test]
    fn ten_by_ten_splits_into_quadrants() {
        let windows = image_windows(10, 10, 4, 0, 1).unwrap();
        assert_eq!(
            windows,
            vec![
                Window { rows: 0..5, cols: 0..5 },
                Window { rows: 0..5, cols: 5..10 },
                Window { rows: 5..10, cols: 0..5 },
                Window { rows: 5..10, cols: 5..10 },
            ]
        );
    }

    #[test]
    fn windows_overlap_by_patch_margin() {
        // spacing over 12 px, psize 3, stride 1: offsets 0..=9, split 5/5
        let windows = image_windows(12, 12, 4, 1, 1).unwrap();
        assert_eq!(windows[0].rows, 0..7);
        assert_eq!(windows[3].rows, 5..12);
        assert_eq!(windows[3].origin().row, 5);
    }

    #[test]
    fn empty_chunks_are_dropped() {
        // single offset per axis, nine requested windows
        let windows = image_windows(5, 5, 9, 2, 1).unwrap();
        assert_eq!(windows, vec![Window { rows: 0..5, cols: 0..5 }]);
    }

    #[test]
    fn rejects_zero_windows_and_oversized_patches() {
        assert_eq!(
            image_windows(10, 10, 0, 0, 1).unwrap_err(),
            PatchError::InvalidParameter("n_windows must be at least 1")
        );
        assert_eq!(
            image_windows(10, 4, 1, 2, 1).unwrap_err(),
            PatchError::PatchTooLarge {
                dimension: 4,
                psize: 5
            }
        );
    }
}
