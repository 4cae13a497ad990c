//! Re-export public algorithms.

pub mod flood;
pub mod meshgen;
pub mod neighbours;
pub mod parallel;

pub use flood::{FloodBuilder, flood, flood_many, flood_with_opts};
pub use neighbours::{build_adjacency, build_adjacency_with_report, build_compact_adjacency};
