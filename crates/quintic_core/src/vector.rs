//! Elementwise helpers over equal-length state vectors.

use crate::traits::Scalar;

/// dst <- src
pub fn copy<T: Scalar>(dst: &mut [T], src: &[T]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.copy_from_slice(src);
}

/// dst <- dst + c * src
pub fn add_scaled<T: Scalar>(dst: &mut [T], src: &[T], c: T) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = *d + c * s;
    }
}

/// Largest absolute componentwise difference.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
