//! Error types for patchgrid.

use thiserror::Error;

/// Result alias for patchgrid operations.
pub type PatchResult<T> = std::result::Result<T, PatchError>;

/// Broad failure category of a [`PatchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image (or mask) does not have a usable shape.
    Shape,
    /// A requested patch or region falls outside the image.
    Bounds,
    /// A patch or window parameter is out of range.
    Parameter,
}

/// Errors that can occur when extracting patches.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// The image array is neither rank 2 nor rank 3.
    #[error("image must be a 2D or 3D array, got rank {ndim}")]
    InvalidRank { ndim: usize },
    /// One of the image extents is zero.
    #[error("invalid image shape: {rows}x{cols}x{channels}")]
    InvalidShape {
        rows: usize,
        cols: usize,
        channels: usize,
    },
    /// The backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Row stride is smaller than one row of pixels.
    #[error("invalid stride {stride} for a row of {row_len} elements")]
    InvalidStride { row_len: usize, stride: usize },
    /// The array is not laid out contiguously in row-major order.
    #[error("array must be contiguous in standard (row-major) layout")]
    NonContiguous,
    /// Data and mask shapes differ.
    #[error("mask shape {mask:?} does not match data shape {data:?}")]
    MaskMismatch {
        data: (usize, usize, usize),
        mask: (usize, usize, usize),
    },
    /// A point patch would extend past the image border.
    #[error(
        "point {index} at ({row}, {col}) is outside the image bounds \
         ({rows}x{cols}) for pwidth {pwidth}"
    )]
    PointOutOfBounds {
        index: usize,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
        pwidth: usize,
    },
    /// A region of interest does not fit inside the image.
    #[error("roi out of bounds: ({row}, {col}) {rows}x{cols} in {img_rows}x{img_cols}")]
    RoiOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
        img_rows: usize,
        img_cols: usize,
    },
    /// The patch is larger than the image along an axis.
    #[error("patch size {psize} exceeds image dimension {dimension}")]
    PatchTooLarge { dimension: usize, psize: usize },
    /// A parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

impl PatchError {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PatchError::InvalidRank { .. }
            | PatchError::InvalidShape { .. }
            | PatchError::BufferTooSmall { .. }
            | PatchError::InvalidStride { .. }
            | PatchError::NonContiguous
            | PatchError::MaskMismatch { .. } => ErrorKind::Shape,
            PatchError::PointOutOfBounds { .. } | PatchError::RoiOutOfBounds { .. } => {
                ErrorKind::Bounds
            }
            PatchError::PatchTooLarge { .. } | PatchError::InvalidParameter(_) => {
                ErrorKind::Parameter
            }
        }
    }
}
