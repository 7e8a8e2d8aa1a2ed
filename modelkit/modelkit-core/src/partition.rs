//! Splitting ordered sequences into chunks.

use std::num::NonZeroUsize;

/// Contiguous chunks of `size`; the last one may be shorter.
pub fn partition_fixed<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    items.chunks(size.get()).map(<[T]>::to_vec).collect()
}

/// `ceil(n / size)` buckets, element `i` going to bucket `i * buckets / n`.
/// Bucket sizes differ by at most one and order is preserved.
pub fn partition_even<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    let buckets = n.div_ceil(size.get());
    let mut out = vec![Vec::with_capacity(size.get()); buckets];
    for (i, item) in items.iter().enumerate() {
        out[i * buckets / n].push(item.clone());
    }
    out
}
