//! Bake triangle-to-triangle adjacency by matching corner positions.
//!
//! Two triangles are neighbours when exactly two of their corners coincide
//! (within [`AdjacencyOpts::tolerance`] on every axis), i.e. they share an edge.
//! Matching is positional, not by vertex index, so meshes whose vertices were
//! split along seams still connect across the seam.
//!
//! Every triangle scans every other triangle, so the bake is `O(T²)`. Each scan
//! only reads the shared mesh and writes its own entry, which makes the bake a
//! plain parallel map over triangle indices (see [`par_map_indices`]).
//!
//! Determinism:
//! - Neighbours are recorded in ascending triangle order, slot 0 first.
//! - Only the first three matches are kept; further matches indicate a
//!   non-manifold edge and are reported in [`AdjacencyReport::overflow`].

use serde::{Deserialize, Serialize};

use crate::algs::parallel::par_map_indices;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::tolerance::{DEFAULT_POSITION_TOLERANCE, matching_corner_pairs};
use crate::mesh_error::MeshFloodError;
use crate::topology::index::MeshIndex;
use crate::topology::mesh::{TriangleMesh, check_index_width};

/// Neighbour slots per triangle.
pub const SLOTS_PER_TRIANGLE: usize = 3;

/// Options for baking an adjacency table.
#[derive(Clone, Copy, Debug)]
pub struct AdjacencyOpts {
    /// Absolute per-axis tolerance for two corners to count as the same point.
    pub tolerance: f32,
    /// Scan triangles on the Rayon pool (ignored without the `rayon` feature).
    pub parallel: bool,
}

impl Default for AdjacencyOpts {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_POSITION_TOLERANCE,
            parallel: true,
        }
    }
}

/// Per-triangle neighbour slots, stored in index width `I`.
///
/// Empty slots hold `I::NONE`; accessors translate them to `None`, so an
/// empty slot can never be mistaken for triangle 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyTable<I: MeshIndex = u32> {
    slots: Vec<[I; SLOTS_PER_TRIANGLE]>,
}

/// 16-bit storage variant for meshes with fewer than `u16::MAX` triangles.
pub type CompactAdjacencyTable = AdjacencyTable<u16>;

impl<I: MeshIndex> AdjacencyTable<I> {
    /// Wrap raw slots without checking them.
    ///
    /// Used for tables loaded from elsewhere; [`validate_invariants`](DebugInvariants::validate_invariants)
    /// and the flood engine check them before use.
    pub fn from_raw_slots(slots: Vec<[I; SLOTS_PER_TRIANGLE]>) -> Self {
        Self { slots }
    }

    /// Build a table from optional neighbour entries.
    pub fn from_entries<E>(entries: E) -> Result<Self, MeshFloodError>
    where
        E: IntoIterator<Item = [Option<usize>; SLOTS_PER_TRIANGLE]>,
    {
        let slots = entries
            .into_iter()
            .map(|entry| {
                let mut out = [I::NONE; SLOTS_PER_TRIANGLE];
                for (slot, n) in out.iter_mut().zip(entry) {
                    if let Some(n) = n {
                        *slot = encode_slot::<I>(n)?;
                    }
                }
                Ok(out)
            })
            .collect::<Result<Vec<_>, MeshFloodError>>()?;
        Ok(Self { slots })
    }

    /// Number of triangles covered by the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw storage, sentinel included.
    #[inline]
    pub fn raw_slots(&self) -> &[[I; SLOTS_PER_TRIANGLE]] {
        &self.slots
    }

    /// Slots of triangle `t` with the sentinel decoded as `None`.
    ///
    /// # Panics
    /// Panics if `t >= self.len()`.
    #[inline]
    pub fn entry(&self, t: usize) -> [Option<usize>; SLOTS_PER_TRIANGLE] {
        self.slots[t].map(decode_slot)
    }

    /// Recorded neighbours of triangle `t`, in slot order.
    #[inline]
    pub fn neighbours(&self, t: usize) -> impl Iterator<Item = usize> + '_ {
        self.slots[t].iter().copied().filter_map(decode_slot)
    }

    /// Number of filled slots of triangle `t`.
    #[inline]
    pub fn neighbour_count(&self, t: usize) -> usize {
        self.slots[t].iter().filter(|s| !s.is_none()).count()
    }

    /// Iterate decoded entries in triangle order.
    pub fn entries(
        &self,
    ) -> impl ExactSizeIterator<Item = [Option<usize>; SLOTS_PER_TRIANGLE]> + '_ {
        self.slots.iter().map(|s| s.map(decode_slot))
    }

    /// Total number of empty slots (boundary edges on a manifold mesh).
    pub fn boundary_slot_count(&self) -> usize {
        self.slots
            .iter()
            .flat_map(|s| s.iter())
            .filter(|s| s.is_none())
            .count()
    }

    /// Pairs `(a, b)` where `a` records `b` but `b` does not record `a`.
    ///
    /// Empty on a closed manifold mesh. Open or non-manifold meshes may produce
    /// entries because overflowing matches are dropped on one side only.
    /// Neighbours outside the table are ignored.
    pub fn asymmetric_pairs(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for a in 0..self.len() {
            for b in self.neighbours(a) {
                if b < self.len() && !self.neighbours(b).any(|x| x == a) {
                    out.push((a, b));
                }
            }
        }
        out
    }

    /// Check that the table covers `triangle_count` triangles and only names
    /// triangles of that range.
    pub fn check_against(&self, triangle_count: usize) -> Result<(), MeshFloodError> {
        if self.len() != triangle_count {
            return Err(MeshFloodError::AdjacencyMismatch {
                table: self.len(),
                mesh: triangle_count,
            });
        }
        for t in 0..self.len() {
            if let Some(n) = self.neighbours(t).find(|&n| n >= triangle_count) {
                return Err(MeshFloodError::NeighbourOutOfRange {
                    triangle: t,
                    neighbour: n,
                    triangle_count,
                });
            }
        }
        Ok(())
    }

    /// Re-encode the slots with another width.
    pub fn with_index_width<J: MeshIndex>(&self) -> Result<AdjacencyTable<J>, MeshFloodError> {
        AdjacencyTable::<J>::from_entries(self.entries())
    }
}

impl<I: MeshIndex> DebugInvariants for AdjacencyTable<I> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "AdjacencyTable");
    }

    fn validate_invariants(&self) -> Result<(), MeshFloodError> {
        self.check_against(self.len())?;
        for (t, entry) in self.entries().enumerate() {
            if entry.contains(&Some(t)) {
                return Err(MeshFloodError::SelfNeighbour { triangle: t });
            }
            let first_empty = entry.iter().position(Option::is_none);
            if let Some(first_empty) = first_empty
                && entry[first_empty..].iter().any(Option::is_some)
            {
                return Err(MeshFloodError::SparseNeighbourSlots { triangle: t });
            }
        }
        Ok(())
    }
}

#[inline]
fn decode_slot<I: MeshIndex>(slot: I) -> Option<usize> {
    (!slot.is_none()).then(|| slot.index())
}

#[inline]
fn encode_slot<I: MeshIndex>(n: usize) -> Result<I, MeshFloodError> {
    I::from_index(n).ok_or(MeshFloodError::IndexWidthOverflow {
        count: n,
        max: I::capacity(),
    })
}

/// A triangle that matched more than [`SLOTS_PER_TRIANGLE`] candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighbourOverflow {
    pub triangle: usize,
    /// Total number of candidates sharing an edge with `triangle`.
    pub matches: usize,
}

/// Baked table together with the non-manifold diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyReport<I: MeshIndex = u32> {
    pub table: AdjacencyTable<I>,
    /// Triangles whose extra matches were dropped, in triangle order.
    pub overflow: Vec<NeighbourOverflow>,
}

/// Result of scanning one base triangle against the whole mesh.
struct TriangleScan {
    found: [Option<usize>; SLOTS_PER_TRIANGLE],
    matches: usize,
}

fn scan_triangle<I: MeshIndex>(mesh: &TriangleMesh<I>, base: usize, tolerance: f32) -> TriangleScan {
    let base_corners = mesh.triangle_positions(base);
    let mut found = [None; SLOTS_PER_TRIANGLE];
    let mut matches = 0usize;
    for candidate in 0..mesh.triangle_count() {
        let corners = mesh.triangle_positions(candidate);
        // exactly two shared corners: one shared edge; `base` itself scores 3
        if matching_corner_pairs(&base_corners, &corners, tolerance) != 2 {
            continue;
        }
        if matches < SLOTS_PER_TRIANGLE {
            found[matches] = Some(candidate);
        }
        matches += 1;
    }
    TriangleScan { found, matches }
}

/// Bake adjacency into storage width `J` and collect overflow diagnostics.
///
/// Fails with [`MeshFloodError::IndexWidthOverflow`] before scanning if the
/// triangle count does not fit `J`.
pub fn build_adjacency_with_report<J, I>(
    mesh: &TriangleMesh<I>,
    opts: AdjacencyOpts,
) -> Result<AdjacencyReport<J>, MeshFloodError>
where
    J: MeshIndex,
    I: MeshIndex,
{
    let triangle_count = mesh.triangle_count();
    check_index_width::<J>(triangle_count)?;

    let scans = par_map_indices(triangle_count, opts.parallel, |t| {
        scan_triangle(mesh, t, opts.tolerance)
    });

    let mut overflow = Vec::new();
    let mut slots = Vec::with_capacity(triangle_count);
    for (t, scan) in scans.into_iter().enumerate() {
        if scan.matches > SLOTS_PER_TRIANGLE {
            log::warn!(
                "Non-manifold geometry: triangle {t} shares an edge with {} triangles; keeping the first {SLOTS_PER_TRIANGLE}",
                scan.matches
            );
            overflow.push(NeighbourOverflow {
                triangle: t,
                matches: scan.matches,
            });
        }
        // every candidate is < triangle_count, which fits J
        slots.push(
            scan.found
                .map(|n| n.and_then(J::from_index).unwrap_or(J::NONE)),
        );
    }

    let table = AdjacencyTable::from_raw_slots(slots);
    table.debug_assert_invariants();
    log::debug!(
        "baked adjacency for {triangle_count} triangles: {} boundary slots, {} overflowing triangles",
        table.boundary_slot_count(),
        overflow.len()
    );
    Ok(AdjacencyReport { table, overflow })
}

/// Bake a 32-bit adjacency table with default options.
pub fn build_adjacency<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
) -> Result<AdjacencyTable<u32>, MeshFloodError> {
    Ok(build_adjacency_with_report::<u32, I>(mesh, AdjacencyOpts::default())?.table)
}

/// Bake a 16-bit adjacency table with default options.
pub fn build_compact_adjacency<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
) -> Result<CompactAdjacencyTable, MeshFloodError> {
    Ok(build_adjacency_with_report::<u16, I>(mesh, AdjacencyOpts::default())?.table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> TriangleMesh<u32> {
        TriangleMesh::new(positions, indices).unwrap()
    }

    // unit square split along its diagonal
    fn quad() -> TriangleMesh<u32> {
        mesh(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn single_triangle_has_no_neighbours() {
        let m = mesh(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        let table = build_adjacency(&m).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entry(0), [None, None, None]);
        assert_eq!(table.raw_slots()[0], [u32::MAX; 3]);
        assert_eq!(table.boundary_slot_count(), 3);
    }

    #[test]
    fn quad_halves_see_each_other() {
        let table = build_adjacency(&quad()).unwrap();
        assert_eq!(table.entry(0), [Some(1), None, None]);
        assert_eq!(table.entry(1), [Some(0), None, None]);
        assert!(table.asymmetric_pairs().is_empty());
        table.validate_invariants().unwrap();
    }

    #[test]
    fn shared_corner_only_is_not_adjacent() {
        let m = mesh(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, -1.0, 0.0],
            ],
            vec![0, 1, 2, 0, 3, 4],
        );
        let table = build_adjacency(&m).unwrap();
        assert_eq!(table.neighbour_count(0), 0);
        assert_eq!(table.neighbour_count(1), 0);
    }

    #[test]
    fn duplicate_triangle_is_excluded() {
        // triangle 1 repeats triangle 0 exactly: 3 shared corners, not an edge
        let m = mesh(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2, 2, 0, 1],
        );
        let table = build_adjacency(&m).unwrap();
        assert_eq!(table.entry(0), [None, None, None]);
        assert_eq!(table.entry(1), [None, None, None]);
    }

    #[test]
    fn matches_by_position_within_tolerance() {
        // second triangle has its own copies of the shared corners, slightly jittered
        let m = mesh(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.00003, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.99996, 0.0],
            ],
            vec![0, 1, 2, 3, 4, 5],
        );
        let table = build_adjacency(&m).unwrap();
        assert_eq!(table.entry(0), [Some(1), None, None]);

        let strict = build_adjacency_with_report::<u32, u32>(
            &m,
            AdjacencyOpts {
                tolerance: 1e-6,
                parallel: false,
            },
        )
        .unwrap();
        assert_eq!(strict.table.entry(0), [None, None, None]);
    }

    #[test]
    fn fan_on_one_edge_keeps_first_three() {
        // five triangles hinged on the edge (0,0,0)-(1,0,0)
        let mut positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let mut indices = Vec::new();
        for k in 0..5u32 {
            let angle = k as f32;
            positions.push([0.5, angle.cos(), angle.sin()]);
            indices.extend([0, 1, 2 + k]);
        }
        let m = mesh(positions, indices);
        let report = build_adjacency_with_report::<u32, u32>(&m, AdjacencyOpts::default()).unwrap();

        assert_eq!(report.table.entry(0), [Some(1), Some(2), Some(3)]);
        assert_eq!(report.table.entry(4), [Some(0), Some(1), Some(2)]);
        assert_eq!(report.overflow.len(), 5);
        assert_eq!(
            report.overflow[0],
            NeighbourOverflow {
                triangle: 0,
                matches: 4
            }
        );
        // 4 records 0 but 0 dropped 4
        assert!(report.table.asymmetric_pairs().contains(&(4, 0)));
    }

    #[test]
    fn compact_and_wide_agree() {
        let m = quad();
        let wide = build_adjacency(&m).unwrap();
        let compact = build_compact_adjacency(&m.with_index_width::<u16>().unwrap()).unwrap();
        assert_eq!(compact.raw_slots()[0], [1u16, u16::MAX, u16::MAX]);
        assert_eq!(wide.entries().collect::<Vec<_>>(), compact.entries().collect::<Vec<_>>());
        assert_eq!(wide.with_index_width::<u16>().unwrap(), compact);
    }

    #[test]
    fn entries_reject_values_past_the_sentinel() {
        let err = CompactAdjacencyTable::from_entries([[Some(70_000), None, None]]).unwrap_err();
        assert_eq!(
            err,
            MeshFloodError::IndexWidthOverflow {
                count: 70_000,
                max: 65_535
            }
        );
    }

    #[test]
    fn invariants_flag_corrupt_tables() {
        let selfish = AdjacencyTable::<u32>::from_entries([[Some(0), None, None]]).unwrap();
        assert_eq!(
            selfish.validate_invariants(),
            Err(MeshFloodError::SelfNeighbour { triangle: 0 })
        );

        let sparse =
            AdjacencyTable::<u32>::from_entries([[None, Some(1), None], [Some(0), None, None]])
                .unwrap();
        assert_eq!(
            sparse.validate_invariants(),
            Err(MeshFloodError::SparseNeighbourSlots { triangle: 0 })
        );

        let dangling = AdjacencyTable::<u32>::from_entries([[Some(5), None, None]]).unwrap();
        assert_eq!(
            dangling.check_against(1),
            Err(MeshFloodError::NeighbourOutOfRange {
                triangle: 0,
                neighbour: 5,
                triangle_count: 1
            })
        );
        assert_eq!(
            dangling.check_against(2),
            Err(MeshFloodError::AdjacencyMismatch { table: 1, mesh: 2 })
        );
    }
}
