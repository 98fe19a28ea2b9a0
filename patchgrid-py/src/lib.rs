//! Python bindings for the patchgrid patch extraction library.
//!
//! Images arrive as `float64` NumPy arrays of shape `(rows, cols)` or
//! `(rows, cols, channels)`; patches are returned as 2D arrays with one
//! flattened patch per row.

use ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2, PyReadonlyArrayDyn};
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use patchgrid::grid::grid_patches_masked;
use patchgrid::{
    check_image, grid_patches as rust_grid_patches, image_windows as rust_image_windows,
    point_patches as rust_point_patches, spacing as rust_spacing, Centre, ErrorKind,
    MaskedRaster, PatchError, RasterView,
};

/// Bounds errors map to `IndexError`, everything else to `ValueError`.
fn to_py_err(err: PatchError) -> PyErr {
    match err.kind() {
        ErrorKind::Bounds => PyIndexError::new_err(err.to_string()),
        ErrorKind::Shape | ErrorKind::Parameter => PyValueError::new_err(err.to_string()),
    }
}

/// Stacks equally sized flattened patches into an `(n, len)` array.
fn stack(rows: Vec<Vec<f64>>, len: usize) -> PyResult<Array2<f64>> {
    let n = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n, len), flat).map_err(|err| PyValueError::new_err(err.to_string()))
}

fn centres_array(centres: &[Centre]) -> Array2<i64> {
    Array2::from_shape_fn((centres.len(), 2), |(i, axis)| {
        let c = centres[i];
        if axis == 0 {
            c.row as i64
        } else {
            c.col as i64
        }
    })
}

/// Patch start offsets along one axis.
///
/// Args:
///     dimension: Axis length in pixels
///     psize: Full patch side length
///     stride: Step between offsets
#[pyfunction]
fn spacing(dimension: usize, psize: usize, stride: usize) -> PyResult<Vec<usize>> {
    Ok(rust_spacing(dimension, psize, stride)
        .map_err(to_py_err)?
        .to_vec())
}

/// Extract flattened patches on a strided grid.
///
/// Args:
///     image: float64 array (rows, cols) or (rows, cols, channels)
///     pwidth: Patch half-width; the patch side is 2 * pwidth + 1
///     pstride: Step between patch centres (values below 1 are treated as 1)
///     centre_offset: Optional (row, col) added to every centre
///
/// Returns:
///     Tuple (patches, centres) with shapes (n, psize**2 * channels) and (n, 2)
#[pyfunction]
#[pyo3(signature = (image, pwidth, pstride, centre_offset = None))]
fn grid_patches<'py>(
    py: Python<'py>,
    image: PyReadonlyArrayDyn<'py, f64>,
    pwidth: usize,
    pstride: usize,
    centre_offset: Option<(usize, usize)>,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyArray2<i64>>)> {
    let view = RasterView::from_array(image.as_array()).map_err(to_py_err)?;
    let mut patches = rust_grid_patches(view, pwidth, pstride).map_err(to_py_err)?;
    if let Some(offset) = centre_offset {
        patches = patches.with_centre_offset(offset);
    }
    let len = patches.patch_len();
    let (data, centres): (Vec<Vec<f64>>, Vec<Centre>) = patches.unzip();
    Ok((
        stack(data, len)?.into_pyarray(py),
        centres_array(&centres).into_pyarray(py),
    ))
}

/// Extract flattened patches and masks on a strided grid.
///
/// Args:
///     image: float64 array (rows, cols) or (rows, cols, channels)
///     mask: bool array of the same shape, True marking invalid pixels
///     pwidth: Patch half-width
///     pstride: Step between patch centres
///
/// Returns:
///     Tuple (patches, masks, centres)
#[pyfunction]
fn grid_patches_with_mask<'py>(
    py: Python<'py>,
    image: PyReadonlyArrayDyn<'py, f64>,
    mask: PyReadonlyArrayDyn<'py, bool>,
    pwidth: usize,
    pstride: usize,
) -> PyResult<(
    Bound<'py, PyArray2<f64>>,
    Bound<'py, PyArray2<bool>>,
    Bound<'py, PyArray2<i64>>,
)> {
    let data = RasterView::from_array(image.as_array()).map_err(to_py_err)?;
    let mask = RasterView::from_array(mask.as_array()).map_err(to_py_err)?;
    let masked = MaskedRaster::new(data, mask).map_err(to_py_err)?;
    let psize = 2 * pwidth + 1;
    let len = psize * psize * data.channels();

    let mut values = Vec::new();
    let mut flags = Vec::new();
    let mut centres = Vec::new();
    for (patch, centre) in grid_patches_masked(masked, pwidth, pstride).map_err(to_py_err)? {
        values.extend(patch.data);
        flags.extend(patch.mask);
        centres.push(centre);
    }
    let n = centres.len();
    let values = Array2::from_shape_vec((n, len), values)
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
    let flags = Array2::from_shape_vec((n, len), flags)
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
    Ok((
        values.into_pyarray(py),
        flags.into_pyarray(py),
        centres_array(&centres).into_pyarray(py),
    ))
}

/// Extract flattened patches centred on pixel points.
///
/// Args:
///     image: float64 array (rows, cols) or (rows, cols, channels)
///     points: int64 array (n, 2) of (row, col) centres
///     pwidth: Patch half-width
///
/// Raises:
///     IndexError: if any patch would extend past the image border
#[pyfunction]
fn point_patches<'py>(
    py: Python<'py>,
    image: PyReadonlyArrayDyn<'py, f64>,
    points: PyReadonlyArray2<'py, i64>,
    pwidth: usize,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let view = RasterView::from_array(image.as_array()).map_err(to_py_err)?;
    let points = points.as_array();
    if points.ncols() != 2 {
        return Err(PyValueError::new_err("points must have shape (n, 2)"));
    }
    let mut centres = Vec::with_capacity(points.nrows());
    for (index, row) in points.rows().into_iter().enumerate() {
        let (r, c) = (row[0], row[1]);
        if r < 0 || c < 0 {
            return Err(PyIndexError::new_err(format!(
                "point {index} at ({r}, {c}) is outside the image bounds"
            )));
        }
        centres.push((r as usize, c as usize));
    }
    let psize = 2 * pwidth + 1;
    let len = psize * psize * view.channels();
    let patches: Vec<Vec<f64>> = rust_point_patches(view, pwidth, &centres)
        .map_err(to_py_err)?
        .collect();
    Ok(stack(patches, len)?.into_pyarray(py))
}

/// Split an image into sub-windows aligned with the patch grid.
///
/// Args:
///     shape: Image shape (rows, cols) or (rows, cols, channels)
///     nwindows: Requested number of windows (nearest square is used)
///     pwidth: Patch half-width
///     pstride: Step between patch centres
///
/// Returns:
///     List of ((row_start, row_stop), (col_start, col_stop)) tuples
#[pyfunction]
#[allow(clippy::type_complexity)]
fn image_windows(
    shape: Vec<usize>,
    nwindows: usize,
    pwidth: usize,
    pstride: usize,
) -> PyResult<Vec<((usize, usize), (usize, usize))>> {
    let shape = check_image(&shape).map_err(to_py_err)?;
    let windows = rust_image_windows(shape.rows, shape.cols, nwindows, pwidth, pstride)
        .map_err(to_py_err)?;
    Ok(windows
        .into_iter()
        .map(|w| ((w.rows.start, w.rows.end), (w.cols.start, w.cols.end)))
        .collect())
}

/// Python module for patchgrid patch extraction.
#[pymodule]
fn _patchgrid(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(spacing, m)?)?;
    m.add_function(wrap_pyfunction!(grid_patches, m)?)?;
    m.add_function(wrap_pyfunction!(grid_patches_with_mask, m)?)?;
    m.add_function(wrap_pyfunction!(point_patches, m)?)?;
    m.add_function(wrap_pyfunction!(image_windows, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
