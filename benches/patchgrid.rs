use criterion::{criterion_group, criterion_main, Criterion};
use patchgrid::{
    dense_patches, grid_patches, image_windows, point_patch_block, window_patches, RasterView,
};
use std::hint::black_box;

fn make_raster(rows: usize, cols: usize, channels: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols * channels);
    for y in 0..rows {
        for x in 0..cols {
            for k in 0..channels {
                let value = ((x * 13) ^ (y * 7) ^ (x * y) ^ k) & 0xFF;
                data.push(value as f32);
            }
        }
    }
    data
}

fn bench_extraction(c: &mut Criterion) {
    let rows = 512;
    let cols = 512;
    let channels = 4;
    let data = make_raster(rows, cols, channels);
    let image = RasterView::with_channels(&data, rows, cols, channels).unwrap();

    c.bench_function("grid_patches_pwidth2_stride4", |b| {
        b.iter(|| {
            let total: usize = grid_patches(image, 2, 4)
                .unwrap()
                .map(|(patch, _)| patch.len())
                .sum();
            black_box(total)
        });
    });

    c.bench_function("dense_patches_pwidth1", |b| {
        b.iter(|| black_box(dense_patches(image, 1).unwrap()));
    });

    let points: Vec<(usize, usize)> = (0..4096)
        .map(|i| (3 + (i * 37) % (rows - 6), 3 + (i * 91) % (cols - 6)))
        .collect();
    c.bench_function("point_patch_block_4096", |b| {
        b.iter(|| black_box(point_patch_block(image, 3, &points).unwrap()));
    });

    c.bench_function("windowed_grid_16", |b| {
        b.iter(|| {
            let mut count = 0usize;
            for window in image_windows(rows, cols, 16, 2, 4).unwrap() {
                count += window_patches(image, &window, 2, 4).unwrap().count();
            }
            black_box(count)
        });
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
