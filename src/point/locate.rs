//! Point extraction from geographic positions.
//!
//! Georeferencing lives outside this crate; it is reached through the
//! [`PixelLocator`] trait. Positions the locator reports as outside the image
//! are dropped, and the indices of the kept positions are returned alongside
//! their patches so callers can join them back to point metadata.

use ndarray::Array4;

use crate::image::RasterView;
use crate::point::{point_patch_block, point_patches, PointPatches};
use crate::trace::{trace_event, trace_span};
use crate::util::{PatchError, PatchResult};

/// Maps geographic positions `(lon, lat)` to pixel `(row, col)`.
pub trait PixelLocator {
    /// True when the position falls inside the raster footprint.
    fn in_bounds(&self, lonlat: (f64, f64)) -> bool;

    /// Pixel containing an in-bounds position.
    fn lonlat_to_pix(&self, lonlat: (f64, f64)) -> (usize, usize);
}

/// North-up affine georeferencing: origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineLocator {
    origin_lon: f64,
    origin_lat: f64,
    pixel_width: f64,
    pixel_height: f64,
    rows: usize,
    cols: usize,
}

impl AffineLocator {
    /// Creates a locator; `pixel_width` and `pixel_height` are positive
    /// extents in degrees, latitude decreasing with row.
    pub fn new(
        origin: (f64, f64),
        pixel_size: (f64, f64),
        rows: usize,
        cols: usize,
    ) -> PatchResult<Self> {
        let (pixel_width, pixel_height) = pixel_size;
        if !(pixel_width.is_finite() && pixel_width > 0.0)
            || !(pixel_height.is_finite() && pixel_height > 0.0)
        {
            return Err(PatchError::InvalidParameter("pixel size must be positive"));
        }
        if rows == 0 || cols == 0 {
            return Err(PatchError::InvalidShape {
                rows,
                cols,
                channels: 1,
            });
        }
        Ok(Self {
            origin_lon: origin.0,
            origin_lat: origin.1,
            pixel_width,
            pixel_height,
            rows,
            cols,
        })
    }

    fn fractional(&self, (lon, lat): (f64, f64)) -> (f64, f64) {
        let row = (self.origin_lat - lat) / self.pixel_height;
        let col = (lon - self.origin_lon) / self.pixel_width;
        (row, col)
    }
}

impl PixelLocator for AffineLocator {
    fn in_bounds(&self, lonlat: (f64, f64)) -> bool {
        let (row, col) = self.fractional(lonlat);
        (0.0..self.rows as f64).contains(&row) && (0.0..self.cols as f64).contains(&col)
    }

    fn lonlat_to_pix(&self, lonlat: (f64, f64)) -> (usize, usize) {
        let (row, col) = self.fractional(lonlat);
        let row = (row.floor().max(0.0) as usize).min(self.rows - 1);
        let col = (col.floor().max(0.0) as usize).min(self.cols - 1);
        (row, col)
    }
}

/// Pixel locations of the in-bounds subset of some positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocatedPoints {
    /// Index of each kept position in the caller's input.
    pub indices: Vec<usize>,
    /// `(row, col)` pixel of each kept position.
    pub pixels: Vec<(usize, usize)>,
}

impl LocatedPoints {
    /// Resolves positions through `locator`, keeping in-bounds ones in order.
    pub fn locate<L: PixelLocator + ?Sized>(locator: &L, positions: &[(f64, f64)]) -> Self {
        let mut out = Self::default();
        for (index, &lonlat) in positions.iter().enumerate() {
            if locator.in_bounds(lonlat) {
                out.indices.push(index);
                out.pixels.push(locator.lonlat_to_pix(lonlat));
            }
        }
        out
    }

    /// Number of kept positions.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True when no position was in bounds.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Lazily extracts a flattened patch for every kept position.
    pub fn patches<'a, T: Copy>(
        &self,
        image: RasterView<'a, T>,
        pwidth: usize,
    ) -> PatchResult<PointPatches<'a, '_, T>> {
        point_patches(image, pwidth, &self.pixels)
    }
}

/// Structured patches for the in-bounds positions, with their input indices.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedPatches<T> {
    pub indices: Vec<usize>,
    pub patches: Array4<T>,
}

/// Resolves geographic positions and extracts a patch for each in-bounds one.
///
/// Positions inside the footprint but too close to the border for a full
/// patch fail the whole call, as in [`point_patches`].
pub fn located_patches<T: Copy, L: PixelLocator + ?Sized>(
    image: RasterView<'_, T>,
    locator: &L,
    positions: &[(f64, f64)],
    pwidth: usize,
) -> PatchResult<LocatedPatches<T>> {
    let _span = trace_span!("located_patches", positions = positions.len()).entered();
    let located = LocatedPoints::locate(locator, positions);
    trace_event!(
        "located_points",
        kept = located.len(),
        dropped = positions.len() - located.len()
    );
    let patches = point_patch_block(image, pwidth, &located.pixels)?;
    Ok(LocatedPatches {
        indices: located.indices,
        patches,
    })
}

#[cfg(test)]
mod tests {
    use super::{AffineLocator, LocatedPoints, PixelLocator};

    #[test]
    fn affine_locator_maps_cell_corners() {
        let locator = AffineLocator::new((100.0, -20.0), (0.5, 0.25), 8, 10).unwrap();
        assert_eq!(locator.lonlat_to_pix((100.0, -20.0)), (0, 0));
        assert_eq!(locator.lonlat_to_pix((101.2, -20.6)), (2, 2));
        assert!(locator.in_bounds((104.9, -21.9)));
        assert!(!locator.in_bounds((105.0, -21.0)));
        assert!(!locator.in_bounds((99.9, -21.0)));
        assert!(!locator.in_bounds((101.0, -19.9)));
    }

    #[test]
    fn locate_keeps_input_indices() {
        let locator = AffineLocator::new((0.0, 10.0), (1.0, 1.0), 10, 10).unwrap();
        let positions = [(0.5, 9.5), (-1.0, 5.0), (3.5, 4.5)];
        let located = LocatedPoints::locate(&locator, &positions);
        assert_eq!(located.indices, vec![0, 2]);
        assert_eq!(located.pixels, vec![(0, 0), (5, 3)]);
    }

    #[test]
    fn rejects_degenerate_pixel_size() {
        assert!(AffineLocator::new((0.0, 0.0), (0.0, 1.0), 4, 4).is_err());
        assert!(AffineLocator::new((0.0, 0.0), (1.0, f64::NAN), 4, 4).is_err());
    }
}
