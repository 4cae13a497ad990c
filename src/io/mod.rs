//! Persistence helpers for baked adjacency tables.
//!
//! Mesh loading itself is left to the caller; this module only reads and
//! writes the neighbour table so a bake can be reused across runs.

pub mod neighbours_text;

pub use neighbours_text::{NeighbourTableReader, NeighbourTableWriter, table_to_string};
