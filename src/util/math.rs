//! Integer helpers for patch and window arithmetic.

/// Full patch side length for a half-width.
pub(crate) fn patch_size(pwidth: usize) -> usize {
    pwidth * 2 + 1
}

/// Nearest integer side length of a square grid holding `n` cells.
pub(crate) fn nearest_square_side(n: usize) -> usize {
    (n as f64).sqrt().round() as usize
}

/// Splits `0..len` into `sections` contiguous, near-equal ranges.
///
/// The first `len % sections` ranges hold one extra element. Ranges may be
/// empty when `sections > len`. `sections` must be non-zero.
pub(crate) fn split_ranges(len: usize, sections: usize) -> Vec<std::ops::Range<usize>> {
    let base = len / sections;
    let extra = len % sections;
    let mut out = Vec::with_capacity(sections);
    let mut start = 0;
    for idx in 0..sections {
        let size = base + usize::from(idx < extra);
        out.push(start..start + size);
        start += size;
    }
    out
}
