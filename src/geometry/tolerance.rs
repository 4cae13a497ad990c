//! Position equality under an absolute per-axis tolerance.
//!
//! Two vertices are "the same corner" when every axis differs by strictly less
//! than the tolerance. This is deliberately not a Euclidean distance test: it
//! matches vertices split by the importer (hard edges, UV seams) that sit on
//! the same point up to float noise.

use itertools::iproduct;

/// Default tolerance used when baking neighbour tables.
pub const DEFAULT_POSITION_TOLERANCE: f32 = 1.0e-4;

/// `true` iff `|a[k] - b[k]| < tolerance` for every axis `k`.
#[inline]
pub fn positions_match(a: [f32; 3], b: [f32; 3], tolerance: f32) -> bool {
    (a[0] - b[0]).abs() < tolerance
        && (a[1] - b[1]).abs() < tolerance
        && (a[2] - b[2]).abs() < tolerance
}

/// Count matching (base corner, candidate corner) pairs over all 3x3 pairings.
///
/// Two distinct triangles sharing an edge score exactly 2; a triangle compared
/// with itself (or a duplicate of itself) scores at least 3.
#[inline]
pub fn matching_corner_pairs(
    base: &[[f32; 3]; 3],
    candidate: &[[f32; 3]; 3],
    tolerance: f32,
) -> u32 {
    iproduct!(base.iter(), candidate.iter())
        .filter(|&(a, b)| positions_match(*a, *b, tolerance))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_strict_per_axis() {
        let a = [0.0, 0.0, 0.0];
        assert!(positions_match(a, [0.00005, -0.00005, 0.0], 1e-4));
        assert!(!positions_match(a, [0.0, 0.0, 0.001], 1e-4));
        // close in two axes is not enough
        assert!(!positions_match(a, [0.0, 0.5, 0.0], 1e-4));
    }

    #[test]
    fn shared_edge_scores_two() {
        let t0 = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let t1 = [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        let t2 = [[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 1.0, 0.0]];
        assert_eq!(matching_corner_pairs(&t0, &t1, DEFAULT_POSITION_TOLERANCE), 2);
        assert_eq!(matching_corner_pairs(&t0, &t0, DEFAULT_POSITION_TOLERANCE), 3);
        assert_eq!(matching_corner_pairs(&t0, &t2, DEFAULT_POSITION_TOLERANCE), 1);
    }
}
