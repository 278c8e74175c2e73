//! Optional parallel iteration.
//!
//! With the `parallel` feature, collections larger than the threshold are
//! processed with rayon; otherwise iteration is sequential. Results keep
//! input order either way.

/// Collections at or below this size are never parallelized.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Maps over items, in parallel when enabled and above `threshold`.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], threshold: usize, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if items.len() > threshold {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_parallel_map_keeps_order() {
        let items: Vec<i32> = (0..200).collect();
        let out = maybe_parallel_map(&items, 10, |x| x * 2);
        assert_eq!(out, (0..200).map(|x| x * 2).collect::<Vec<_>>());
    }
}
