//! `MeshIndex`: index widths usable for triangle indices and adjacency slots
//!
//! Meshes come with either 16-bit or 32-bit index buffers. Both the index list
//! of a [`TriangleMesh`](crate::topology::mesh::TriangleMesh) and the slots of an
//! [`AdjacencyTable`](crate::algs::neighbours::AdjacencyTable) are generic over
//! this trait, so a small mesh can be processed end to end in 16-bit storage.
//!
//! # Sentinel
//! The largest value of each width is reserved as "no neighbour". A `u16`
//! table therefore addresses at most `u16::MAX` triangles (`0..=65534`), and
//! slot value `0` always means triangle 0.

use num_traits::{Bounded, FromPrimitive, PrimInt, ToPrimitive, Unsigned};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An unsigned integer width that can index vertices and triangles.
pub trait MeshIndex:
    PrimInt + Unsigned + FromPrimitive + Hash + Debug + Display + Send + Sync + 'static
{
    /// Reserved "no neighbour" value.
    const NONE: Self;

    /// Widen to `usize`.
    #[inline]
    fn index(self) -> usize {
        // every implementor is at most 32 bits wide
        ToPrimitive::to_usize(&self).unwrap_or(usize::MAX)
    }

    /// Narrow from `usize`, refusing the sentinel and anything above it.
    #[inline]
    fn from_index(i: usize) -> Option<Self> {
        if i >= Self::NONE.index() {
            return None;
        }
        <Self as FromPrimitive>::from_usize(i)
    }

    /// Whether this value is the "no neighbour" sentinel.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Largest count that can be addressed without colliding with the sentinel.
    #[inline]
    fn capacity() -> usize {
        <Self as Bounded>::max_value().index()
    }
}

impl MeshIndex for u16 {
    const NONE: Self = u16::MAX;
}

impl MeshIndex for u32 {
    const NONE: Self = u32::MAX;
}
