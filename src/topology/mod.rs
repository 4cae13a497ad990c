//! Top-level module for mesh topology input types.
//!
//! It includes:
//! - The `MeshIndex` trait for 16-bit and 32-bit index buffers
//! - `TriangleMesh`, the validated positions + index list consumed by the algorithms

pub mod index;
pub mod mesh;

pub use index::MeshIndex;
pub use mesh::TriangleMesh;
