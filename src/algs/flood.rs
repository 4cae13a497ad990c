//! Breadth-first wave flood over a baked triangle adjacency table.
//!
//! Starting from a seed triangle, the flood advances one ring of neighbouring
//! triangles per round and stamps the corners of every triangle it processes
//! with the round number (the *wave index*). Later rounds overwrite earlier
//! ones, so a vertex ends up with the wave of the farthest triangle using it
//! and the largest vertex wave equals the seed's eccentricity. The wave index
//! is a topological distance: the number of shared-edge hops from the seed,
//! not a metric length.
//!
//! The traversal is inherently sequential (each round's frontier depends on
//! the previous one), but independent floods over the same read-only table
//! can run side by side; see [`flood_many`].
//!
//! Termination: the flood stops when the frontier empties or after
//! [`FloodOpts::max_rounds`] rounds. A well-formed mesh never needs more rounds
//! than it has triangles, so hitting the cap is reported as
//! [`FloodStatus::CapExceeded`] together with the partial field.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::algs::neighbours::AdjacencyTable;
use crate::algs::parallel::par_map_indices;
use crate::mesh_error::MeshFloodError;
use crate::topology::index::MeshIndex;
use crate::topology::mesh::{TriangleMesh, validate_triangle_indices};

/// Default round cap.
pub const DEFAULT_MAX_ROUNDS: usize = 10_000;

/// Which wave a vertex keeps when several visited triangles share it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexWavePolicy {
    /// Overwrite with every later round that touches the vertex, so each
    /// vertex ends up with the wave of the farthest triangle using it.
    #[default]
    LastReached,
    /// Keep the round at which the vertex was first reached. Seed vertices
    /// always hold 0 and a vertex's wave equals its distance to the seed.
    FirstReached,
}

/// Options for a flood run.
#[derive(Clone, Copy, Debug)]
pub struct FloodOpts {
    /// Hard cap on traversal rounds.
    pub max_rounds: usize,
    pub vertex_policy: VertexWavePolicy,
}

impl Default for FloodOpts {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            vertex_policy: VertexWavePolicy::default(),
        }
    }
}

/// Per-vertex wave indices; `None` marks a vertex the flood never reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveField {
    waves: Vec<Option<u32>>,
}

impl WaveField {
    /// A field of `vertex_count` unvisited vertices.
    pub fn unvisited(vertex_count: usize) -> Self {
        Self {
            waves: vec![None; vertex_count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Wave of vertex `v`, or `None` if unvisited (or out of range).
    #[inline]
    pub fn get(&self, v: usize) -> Option<u32> {
        self.waves.get(v).copied().flatten()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Option<u32>] {
        &self.waves
    }

    pub fn into_vec(self) -> Vec<Option<u32>> {
        self.waves
    }

    /// Largest wave stamped on any vertex.
    pub fn max_wave(&self) -> Option<u32> {
        self.waves.iter().flatten().copied().max()
    }

    /// Number of vertices the flood reached.
    pub fn visited_count(&self) -> usize {
        self.waves.iter().filter(|w| w.is_some()).count()
    }

    /// Render as a scalar channel, substituting `unvisited` for unreached vertices.
    ///
    /// This is the shape a renderer expects for a per-vertex attribute.
    pub fn to_scalars(&self, unvisited: f32) -> Vec<f32> {
        self.waves
            .iter()
            .map(|w| w.map_or(unvisited, |w| w as f32))
            .collect()
    }

    #[inline]
    fn stamp(&mut self, v: usize, wave: u32, policy: VertexWavePolicy) {
        let slot = &mut self.waves[v];
        match policy {
            VertexWavePolicy::FirstReached => {
                if slot.is_none() {
                    *slot = Some(wave);
                }
            }
            VertexWavePolicy::LastReached => *slot = Some(wave),
        }
    }
}

/// How a flood ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloodStatus {
    /// The frontier emptied: every triangle reachable from the seed was visited.
    Complete,
    /// The round cap was reached with unvisited triangles still queued; the
    /// field is partial.
    CapExceeded { rounds: usize },
}

/// Result of one flood.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodOutcome {
    /// Per-vertex waves.
    pub field: WaveField,
    /// Per-triangle waves; `None` for triangles never visited.
    pub triangle_waves: Vec<Option<u32>>,
    /// Rounds executed, including a trailing round that only drained duplicates.
    pub rounds: usize,
    pub visited_triangles: usize,
    pub status: FloodStatus,
}

impl FloodOutcome {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == FloodStatus::Complete
    }

    /// Largest triangle wave: the seed's BFS eccentricity within its component.
    pub fn eccentricity(&self) -> Option<u32> {
        self.triangle_waves.iter().flatten().copied().max()
    }
}

/// Builder-style entry point for a flood.
///
/// ```rust
/// use mesh_flood::algs::flood::{FloodBuilder, FloodStatus};
/// use mesh_flood::algs::meshgen::triangle_strip;
/// use mesh_flood::algs::neighbours::build_adjacency;
///
/// let mesh = triangle_strip(4)?;
/// let table = build_adjacency(&mesh)?;
/// let outcome = FloodBuilder::new(&table, &mesh).seed(0).run()?;
/// assert_eq!(outcome.status, FloodStatus::Complete);
/// assert_eq!(outcome.field.get(5), Some(3));
/// assert_eq!(outcome.field.max_wave(), outcome.eccentricity());
/// # Ok::<(), mesh_flood::mesh_error::MeshFloodError>(())
/// ```
pub struct FloodBuilder<'a, I: MeshIndex, J: MeshIndex> {
    table: &'a AdjacencyTable<J>,
    indices: &'a [I],
    vertex_count: usize,
    seed: usize,
    opts: FloodOpts,
}

impl<'a, I: MeshIndex, J: MeshIndex> FloodBuilder<'a, I, J> {
    pub fn new(table: &'a AdjacencyTable<J>, mesh: &'a TriangleMesh<I>) -> Self {
        Self::from_parts(table, mesh.indices(), mesh.vertex_count())
    }

    /// Flood over a bare index list, e.g. one kept in a GPU-side buffer.
    pub fn from_parts(
        table: &'a AdjacencyTable<J>,
        indices: &'a [I],
        vertex_count: usize,
    ) -> Self {
        Self {
            table,
            indices,
            vertex_count,
            seed: 0,
            opts: FloodOpts::default(),
        }
    }

    pub fn seed(mut self, triangle: usize) -> Self {
        self.seed = triangle;
        self
    }

    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.opts.max_rounds = rounds;
        self
    }

    pub fn vertex_policy(mut self, policy: VertexWavePolicy) -> Self {
        self.opts.vertex_policy = policy;
        self
    }

    pub fn opts(mut self, opts: FloodOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn run(self) -> Result<FloodOutcome, MeshFloodError> {
        flood_with_opts(self.table, self.indices, self.vertex_count, self.seed, self.opts)
    }
}

/// Flood `mesh` from `seed` with default options.
pub fn flood<I: MeshIndex, J: MeshIndex>(
    table: &AdjacencyTable<J>,
    mesh: &TriangleMesh<I>,
    seed: usize,
) -> Result<FloodOutcome, MeshFloodError> {
    flood_with_opts(table, mesh.indices(), mesh.vertex_count(), seed, FloodOpts::default())
}

/// Flood from `seed` over a raw index list.
///
/// All inputs are checked before the traversal starts: the index list shape,
/// the seed range, and that `table` covers exactly the mesh's triangles.
pub fn flood_with_opts<I: MeshIndex, J: MeshIndex>(
    table: &AdjacencyTable<J>,
    indices: &[I],
    vertex_count: usize,
    seed: usize,
    opts: FloodOpts,
) -> Result<FloodOutcome, MeshFloodError> {
    check_flood_inputs(table, indices, vertex_count)?;
    check_seed(seed, indices.len() / 3)?;
    Ok(run_flood(table, indices, vertex_count, seed, opts))
}

/// Run one flood per seed against the same table, in parallel when the
/// `rayon` feature is enabled. Outcomes are returned in seed order.
pub fn flood_many<I: MeshIndex, J: MeshIndex>(
    table: &AdjacencyTable<J>,
    mesh: &TriangleMesh<I>,
    seeds: &[usize],
    opts: FloodOpts,
) -> Result<Vec<FloodOutcome>, MeshFloodError> {
    check_flood_inputs(table, mesh.indices(), mesh.vertex_count())?;
    for &seed in seeds {
        check_seed(seed, mesh.triangle_count())?;
    }
    Ok(par_map_indices(seeds.len(), true, |i| {
        run_flood(table, mesh.indices(), mesh.vertex_count(), seeds[i], opts)
    }))
}

fn check_flood_inputs<I: MeshIndex, J: MeshIndex>(
    table: &AdjacencyTable<J>,
    indices: &[I],
    vertex_count: usize,
) -> Result<(), MeshFloodError> {
    validate_triangle_indices(indices, vertex_count)?;
    table.check_against(indices.len() / 3)
}

fn check_seed(seed: usize, triangle_count: usize) -> Result<(), MeshFloodError> {
    if seed >= triangle_count {
        return Err(MeshFloodError::SeedOutOfRange {
            seed,
            triangle_count,
        });
    }
    Ok(())
}

// Inputs are validated; indexing below cannot go out of bounds.
fn run_flood<I: MeshIndex, J: MeshIndex>(
    table: &AdjacencyTable<J>,
    indices: &[I],
    vertex_count: usize,
    seed: usize,
    opts: FloodOpts,
) -> FloodOutcome {
    let triangle_count = indices.len() / 3;
    let mut visited = vec![false; triangle_count];
    let mut triangle_waves = vec![None; triangle_count];
    let mut field = WaveField::unvisited(vertex_count);
    let mut frontier: VecDeque<usize> = VecDeque::from([seed]);

    let mut wave: u32 = 0;
    let mut rounds = 0usize;
    let mut visited_triangles = 0usize;

    while !frontier.is_empty() && rounds < opts.max_rounds {
        rounds += 1;
        let visited_before = visited_triangles;

        // only triangles queued before this round belong to it
        let round_len = frontier.len();
        for _ in 0..round_len {
            let Some(t) = frontier.pop_front() else {
                break;
            };
            if visited[t] {
                continue;
            }
            visited[t] = true;
            visited_triangles += 1;
            triangle_waves[t] = Some(wave);

            for &corner in &indices[3 * t..3 * t + 3] {
                field.stamp(corner.index(), wave, opts.vertex_policy);
            }
            frontier.extend(table.neighbours(t).filter(|&n| !visited[n]));
        }

        // a round that visits nothing new can only have drained duplicates
        debug_assert!(
            visited_triangles > visited_before || frontier.is_empty(),
            "flood round {rounds} made no progress but queued more triangles"
        );
        wave = wave.saturating_add(1);
    }

    let status = if frontier.iter().any(|&t| !visited[t]) {
        log::warn!(
            "Flood from triangle {seed} stopped at the round cap ({rounds}) with {visited_triangles}/{triangle_count} triangles visited"
        );
        FloodStatus::CapExceeded { rounds }
    } else {
        FloodStatus::Complete
    };
    log::debug!(
        "flood from triangle {seed}: {rounds} rounds, {visited_triangles}/{triangle_count} triangles"
    );

    FloodOutcome {
        field,
        triangle_waves,
        rounds,
        visited_triangles,
        status,
    }
}
