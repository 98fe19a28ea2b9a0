//! Patchgrid extracts square patches from raster images for per-pixel and
//! per-point feature vectors.
//!
//! Patches can be taken on a strided grid ([`grid_patches`]), densely at unit
//! stride ([`dense_patches`]), around explicit pixel or geographic points
//! ([`point_patches`], [`located_patches`]), or window by window after
//! partitioning the grid with [`image_windows`]. Every extractor has a masked
//! counterpart that carries a per-pixel validity mask through unchanged.

pub mod grid;
pub mod image;
pub mod point;
mod trace;
pub mod util;
pub mod window;

pub use grid::{
    dense_patch_grid, dense_patches, dense_patches_masked, grid_patches, grid_patches_masked,
    spacing, Centre, GridPatches, PatchParams, Spacing,
};
pub use image::{check_image, ImageShape, MaskedPatch, MaskedPatchArray, MaskedRaster, RasterView};
pub use point::{
    check_points, located_patches, point_patch_block, point_patch_block_masked, point_patches,
    point_patches_masked, AffineLocator, LocatedPatches, LocatedPoints, PixelLocator,
    PointPatches,
};
pub use util::{ErrorKind, PatchError, PatchResult};
pub use window::{image_windows, window_patches, Window};
