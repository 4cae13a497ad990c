#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-flood
//!
//! mesh-flood bakes triangle-to-triangle adjacency for a triangulated mesh and
//! floods it breadth-first from a seed triangle, producing a per-vertex *wave
//! index*: the number of shared-edge hops from the seed.
//!
//! ## Pipeline
//! 1. [`algs::neighbours`] scans every triangle against every other one and
//!    records up to three edge-sharing neighbours. Corners are matched by
//!    position within a tolerance, so split vertices still connect. The scan is
//!    a parallel map over triangles (Rayon, behind the default `rayon` feature).
//! 2. [`io::neighbours_text`] stores the table as one text line per triangle so
//!    the quadratic bake runs once per mesh.
//! 3. [`algs::flood`] runs a level-order traversal from a seed and returns a
//!    [`WaveField`](algs::flood::WaveField), with a hard round cap against
//!    corrupted tables.
//!
//! ## Example
//! ```rust
//! use mesh_flood::prelude::*;
//!
//! let mesh = structured_grid(4, 4, [0.0, 0.0], [1.0, 1.0])?;
//! let table = build_adjacency(&mesh)?;
//! let outcome = flood(&table, &mesh, 0)?;
//! assert!(outcome.is_complete());
//! assert_eq!(outcome.visited_triangles, mesh.triangle_count());
//! let channel = outcome.field.to_scalars(-1.0);
//! assert_eq!(channel.len(), mesh.vertex_count());
//! # Ok::<(), mesh_flood::mesh_error::MeshFloodError>(())
//! ```
//!
//! ## Features
//! - `rayon` (default): parallel adjacency bake and [`algs::flood::flood_many`].
//! - `check-invariants`: keep `debug_invariants!` checks in release builds.
//!
//! ## Determinism
//! Both the bake and the flood are deterministic: neighbours are recorded in
//! ascending triangle order regardless of thread scheduling, and the flood
//! visits the frontier in FIFO order.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::flood::{
        FloodBuilder, FloodOpts, FloodOutcome, FloodStatus, VertexWavePolicy, WaveField, flood,
        flood_many, flood_with_opts,
    };
    pub use crate::algs::meshgen::{cube_surface, octahedron, structured_grid, triangle_strip};
    pub use crate::algs::neighbours::{
        AdjacencyOpts, AdjacencyReport, AdjacencyTable, CompactAdjacencyTable, NeighbourOverflow,
        build_adjacency, build_adjacency_with_report, build_compact_adjacency,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::neighbours_text::{NeighbourTableReader, NeighbourTableWriter};
    pub use crate::mesh_error::MeshFloodError;
    pub use crate::topology::index::MeshIndex;
    pub use crate::topology::mesh::TriangleMesh;
}
