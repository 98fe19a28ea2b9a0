use ndarray::{Array, Array2, Array3, ArrayD, IxDyn};
use patchgrid::{check_image, ErrorKind, PatchError, PatchParams, RasterView};

#[test]
fn raster_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = RasterView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        PatchError::InvalidShape {
            rows: 0,
            cols: 1,
            channels: 1,
        }
    );
    assert_eq!(err.kind(), ErrorKind::Shape);

    let err = RasterView::with_channels(&data, 1, 1, 0).err().unwrap();
    assert_eq!(
        err,
        PatchError::InvalidShape {
            rows: 1,
            cols: 1,
            channels: 0,
        }
    );
}

#[test]
fn raster_view_rejects_invalid_stride() {
    let data = [0u8; 16];

    let err = RasterView::new(&data, 2, 2, 2, 3).err().unwrap();
    assert_eq!(
        err,
        PatchError::InvalidStride {
            row_len: 4,
            stride: 3,
        }
    );
}

#[test]
fn raster_view_rejects_small_buffer() {
    let data = [0u8; 5];

    let err = RasterView::from_slice(&data, 2, 3).err().unwrap();
    assert_eq!(err, PatchError::BufferTooSmall { needed: 6, got: 5 });
}

#[test]
fn padded_rows_are_skipped() {
    // 3x2 image with one padding element per row
    let data = [1u8, 2, 99, 3, 4, 99, 5, 6];
    let view = RasterView::new(&data, 3, 2, 1, 3).unwrap();
    assert_eq!(view.row(1).unwrap(), &[3, 4]);
    assert_eq!(view.get(2, 1, 0).copied(), Some(6));
    assert!(view.get(2, 2, 0).is_none());
    assert!(view.get(0, 0, 1).is_none());
}

#[test]
fn roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = RasterView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.rows(), 2);
    assert_eq!(roi.cols(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        PatchError::RoiOutOfBounds {
            row: 3,
            col: 3,
            rows: 2,
            cols: 2,
            img_rows: 4,
            img_cols: 4,
        }
    );
    assert_eq!(err.kind(), ErrorKind::Bounds);
}

#[test]
fn from_array_accepts_rank_two_and_three() {
    let grey = Array2::from_shape_fn((3, 4), |(r, c)| (r * 4 + c) as f32);
    let view = RasterView::from_array(grey.view()).unwrap();
    assert_eq!(view.shape().as_tuple(), (3, 4, 1));
    assert_eq!(view.get(2, 3, 0).copied(), Some(11.0));

    let rgb = Array3::from_shape_fn((2, 2, 3), |(r, c, k)| (r * 100 + c * 10 + k) as u16);
    let view = RasterView::from_array(rgb.view()).unwrap();
    assert_eq!(view.shape().as_tuple(), (2, 2, 3));
    assert_eq!(view.pixel(1, 0).unwrap(), &[100, 101, 102]);
}

#[test]
fn from_array_rejects_other_ranks() {
    let cube: ArrayD<u8> = ArrayD::zeros(IxDyn(&[2, 2, 2, 2]));
    let err = RasterView::from_array(cube.view()).err().unwrap();
    assert_eq!(err, PatchError::InvalidRank { ndim: 4 });
    assert_eq!(err.kind(), ErrorKind::Shape);

    let line = Array::from_vec(vec![1u8, 2, 3]);
    let err = RasterView::from_array(line.view()).err().unwrap();
    assert_eq!(err, PatchError::InvalidRank { ndim: 1 });
}

#[test]
fn from_array_rejects_non_standard_layout() {
    let grey = Array2::<u8>::zeros((3, 5));
    let err = RasterView::from_array(grey.t()).err().unwrap();
    assert_eq!(err, PatchError::NonContiguous);
}

#[test]
fn check_image_reports_channels() {
    assert_eq!(check_image(&[7, 9]).unwrap().channels, 1);
    assert_eq!(check_image(&[7, 9, 4]).unwrap().channels, 4);
    assert!(check_image(&[]).is_err());
}

#[test]
fn patch_params_defaults_and_clamping() {
    let params = PatchParams::default();
    assert_eq!(params.psize(), 1);
    assert_eq!(params.effective_stride(), 1);
    let params = PatchParams::new(3, 0);
    assert_eq!(params.psize(), 7);
    assert_eq!(params.effective_stride(), 1);
    assert!(params.validate().is_ok());
    assert_eq!(
        PatchParams::new(usize::MAX / 2 + 1, 1).validate().unwrap_err().kind(),
        ErrorKind::Parameter
    );
}

#[test]
fn views_and_iterators_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RasterView<'static, f32>>();
    assert_send_sync::<patchgrid::MaskedRaster<'static, f32>>();
    assert_send_sync::<patchgrid::GridPatches<'static, f32>>();
    assert_send_sync::<patchgrid::PointPatches<'static, 'static, f32>>();
    assert_send_sync::<PatchError>();
}
