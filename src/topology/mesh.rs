//! Triangle mesh input: vertex positions plus a flat triangle index list.
//!
//! Triangle `t` occupies index-list positions `[3t, 3t + 1, 3t + 2]`. The shape
//! is checked once at construction, so the adjacency builder and the flood
//! engine can index the buffers without further bounds checks failing.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshFloodError;
use crate::topology::index::MeshIndex;

/// Read-only triangulated mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh<I: MeshIndex = u32> {
    positions: Vec<[f32; 3]>,
    indices: Vec<I>,
}

impl<I: MeshIndex> TriangleMesh<I> {
    /// Build a mesh, rejecting a ragged index list or out-of-range vertex references.
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<I>) -> Result<Self, MeshFloodError> {
        validate_triangle_indices(&indices, positions.len())?;
        Ok(Self { positions, indices })
    }

    /// Build a mesh from an interleaved `x y z x y z ...` position buffer.
    pub fn from_flat(positions: &[f32], indices: Vec<I>) -> Result<Self, MeshFloodError> {
        let positions: &[[f32; 3]] = bytemuck::try_cast_slice(positions).map_err(|_| {
            MeshFloodError::PositionCountNotMultipleOfThree {
                len: positions.len(),
            }
        })?;
        Self::new(positions.to_vec(), indices)
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `t`.
    ///
    /// # Panics
    /// Panics if `t >= self.triangle_count()`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        let base = 3 * t;
        [
            self.indices[base].index(),
            self.indices[base + 1].index(),
            self.indices[base + 2].index(),
        ]
    }

    /// Corner positions of triangle `t`.
    #[inline]
    pub fn triangle_positions(&self, t: usize) -> [[f32; 3]; 3] {
        self.triangle(t).map(|v| self.positions[v])
    }

    /// Iterate triangles as vertex index triples, in triangle order.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = [usize; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| self.triangle(t))
    }

    /// Re-encode the index list with another width.
    ///
    /// Fails with [`MeshFloodError::IndexWidthOverflow`] if a vertex index, or
    /// the triangle count, does not fit below the target sentinel.
    pub fn with_index_width<J: MeshIndex>(&self) -> Result<TriangleMesh<J>, MeshFloodError> {
        check_index_width::<J>(self.triangle_count())?;
        check_index_width::<J>(self.vertex_count())?;
        let indices = self
            .indices
            .iter()
            .map(|&i| {
                J::from_index(i.index()).ok_or(MeshFloodError::IndexWidthOverflow {
                    count: i.index(),
                    max: J::capacity(),
                })
            })
            .collect::<Result<Vec<J>, _>>()?;
        Ok(TriangleMesh {
            positions: self.positions.clone(),
            indices,
        })
    }
}

/// Check that `count` items can be addressed by `J` without touching its sentinel.
pub(crate) fn check_index_width<J: MeshIndex>(count: usize) -> Result<(), MeshFloodError> {
    if count > J::capacity() {
        return Err(MeshFloodError::IndexWidthOverflow {
            count,
            max: J::capacity(),
        });
    }
    Ok(())
}

/// Validate a flat triangle index list against a vertex count.
pub fn validate_triangle_indices<I: MeshIndex>(
    indices: &[I],
    vertex_count: usize,
) -> Result<(), MeshFloodError> {
    if indices.len() % 3 != 0 {
        return Err(MeshFloodError::IndexCountNotMultipleOfThree { len: indices.len() });
    }
    for (pos, &i) in indices.iter().enumerate() {
        let index = i.index();
        if index >= vertex_count {
            return Err(MeshFloodError::VertexIndexOutOfRange {
                triangle: pos / 3,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

impl<I: MeshIndex> DebugInvariants for TriangleMesh<I> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "TriangleMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshFloodError> {
        validate_triangle_indices(&self.indices, self.positions.len())
    }
}
