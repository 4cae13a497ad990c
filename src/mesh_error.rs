//! MeshFloodError: Unified error type for mesh-flood public APIs
//!
//! Structural and precondition failures abort with one of these variants before
//! any work is done. Topology anomalies (non-manifold edges, a flood that hits
//! its round cap) are not errors; they are reported next to a best-effort result.

use thiserror::Error;

/// Unified error type for mesh-flood operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshFloodError {
    /// The triangle index list cannot be grouped into triples.
    #[error("Mesh shape error: index list length {len} is not a multiple of 3")]
    IndexCountNotMultipleOfThree { len: usize },
    /// A triangle references a vertex past the end of the position buffer.
    #[error(
        "Mesh shape error: triangle {triangle} references vertex {index} (mesh has {vertex_count} vertices)"
    )]
    VertexIndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
    /// A flat position buffer whose length is not a multiple of 3.
    #[error("Mesh shape error: flat position buffer length {len} is not a multiple of 3")]
    PositionCountNotMultipleOfThree { len: usize },
    /// Generator parameters that cannot describe a mesh.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Flood seed outside `[0, triangle_count)`.
    #[error("Flood seed {seed} is out of range (mesh has {triangle_count} triangles)")]
    SeedOutOfRange { seed: usize, triangle_count: usize },
    /// The mesh does not fit the requested index width.
    #[error("Index width overflow: {count} does not fit below the sentinel value {max}")]
    IndexWidthOverflow { count: usize, max: usize },
    /// Adjacency table and mesh disagree on the triangle count.
    #[error("Adjacency table has {table} entries but the mesh has {mesh} triangles")]
    AdjacencyMismatch { table: usize, mesh: usize },
    /// A recorded neighbour does not name a triangle of the mesh.
    #[error(
        "Triangle {triangle} records neighbour {neighbour} (mesh has {triangle_count} triangles)"
    )]
    NeighbourOutOfRange {
        triangle: usize,
        neighbour: usize,
        triangle_count: usize,
    },
    /// A triangle lists itself as its own neighbour.
    #[error("Triangle {triangle} records itself as a neighbour")]
    SelfNeighbour { triangle: usize },
    /// Filled slots must come before empty ones.
    #[error("Triangle {triangle} has a neighbour recorded after an empty slot")]
    SparseNeighbourSlots { triangle: usize },
    /// Malformed line in a neighbour table text file (1-based line number).
    #[error("Neighbour table parse error at line {line}: {message}")]
    TableParse { line: usize, message: String },
    /// Underlying reader/writer failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshFloodError {
    fn from(e: std::io::Error) -> Self {
        MeshFloodError::Io(e.to_string())
    }
}
