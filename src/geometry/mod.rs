//! Geometry utilities for mesh-flood.
//!
//! This module provides the tolerant position comparison used to decide
//! whether two triangle corners coincide.

pub mod tolerance;
