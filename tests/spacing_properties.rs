//! Randomized checks of the per-axis spacing arithmetic.

use patchgrid::spacing;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 2000;

#[test]
fn spacing_is_nonempty_increasing_and_in_bounds() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..CASES {
        let psize = rng.random_range(1..=25usize);
        let dimension = rng.random_range(psize..=psize + 200);
        let stride = rng.random_range(1..=40usize);

        let s = spacing(dimension, psize, stride).unwrap();
        let offsets = s.to_vec();
        assert!(!offsets.is_empty());
        assert_eq!(offsets.len(), s.len());
        assert_eq!(offsets[0], s.offset());
        assert_eq!(*offsets.last().unwrap(), s.last());
        assert!(s.last() <= dimension - psize);
        for pair in offsets.windows(2) {
            assert_eq!(pair[1] - pair[0], stride);
        }
        // one more step would overrun the image
        assert!(s.last() + stride > dimension - psize);
    }
}

#[test]
fn leftover_is_split_within_one_pixel() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..CASES {
        let psize = rng.random_range(1..=15usize);
        let dimension = rng.random_range(psize..=psize + 150);
        let stride = rng.random_range(1..=30usize);

        let s = spacing(dimension, psize, stride).unwrap();
        let remainder = (dimension - psize) % stride;
        let lead = s.offset();
        let trail = dimension - psize - s.last();
        assert_eq!(lead + trail, remainder);
        assert!(lead <= remainder.div_ceil(2));
        assert!(trail <= remainder.div_ceil(2));
        assert!(trail >= lead);
    }
}

#[test]
fn unit_stride_covers_every_offset() {
    for dimension in 1..30 {
        for psize in 1..=dimension {
            let s = spacing(dimension, psize, 1).unwrap();
            assert_eq!(s.to_vec(), (0..=dimension - psize).collect::<Vec<_>>());
        }
    }
}
