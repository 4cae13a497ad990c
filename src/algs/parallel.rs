//! Data-parallel helpers for the batch algorithms.
//!
//! Work items are indexed `0..n`, read shared immutable inputs and produce one
//! output each; the only synchronization is the join at `collect`.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Evaluate `func(i)` for every `i` in `0..n`, returning results in index order.
///
/// With the `rayon` feature and `parallel == true` the items are spread over the
/// global Rayon pool; otherwise they run in order on the calling thread.
pub fn par_map_indices<T, F>(n: usize, parallel: bool, func: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "rayon")]
    if parallel {
        return (0..n).into_par_iter().map(&func).collect();
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;
    (0..n).map(&func).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_index_order() {
        let seq = par_map_indices(1000, false, |i| i * i);
        let par = par_map_indices(1000, true, |i| i * i);
        assert_eq!(seq, par);
        assert_eq!(par[31], 961);
    }

    #[test]
    fn empty_range() {
        let out: Vec<usize> = par_map_indices(0, true, |i| i);
        assert!(out.is_empty());
    }
}
