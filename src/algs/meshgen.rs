//! Small triangle mesh generators for tests, benches and demos.
//!
//! All generators emit 32-bit indices; narrow with
//! [`TriangleMesh::with_index_width`] when a 16-bit mesh is wanted.

use crate::mesh_error::MeshFloodError;
use crate::topology::mesh::TriangleMesh;

type MeshGenResult = Result<TriangleMesh<u32>, MeshFloodError>;

fn invalid_geometry(message: impl Into<String>) -> MeshFloodError {
    MeshFloodError::InvalidGeometry(message.into())
}

fn to_u32(raw: usize) -> Result<u32, MeshFloodError> {
    u32::try_from(raw).map_err(|_| invalid_geometry(format!("vertex index {raw} exceeds u32")))
}

/// A zig-zag strip of `n` triangles; triangle `k` is `(k, k + 1, k + 2)`.
///
/// Consecutive triangles share an edge, so the adjacency graph is a path and a
/// flood from triangle 0 takes `n` rounds.
pub fn triangle_strip(n: usize) -> MeshGenResult {
    let positions = (0..n + 2)
        .map(|i| [0.5 * i as f32, (i % 2) as f32, 0.0])
        .collect();
    let mut indices = Vec::with_capacity(3 * n);
    for k in 0..n {
        indices.extend([to_u32(k)?, to_u32(k + 1)?, to_u32(k + 2)?]);
    }
    TriangleMesh::new(positions, indices)
}

/// Flat grid over `[min, max]` in the XY plane with `nx`×`ny` cells, each cell
/// split into two triangles along its diagonal.
///
/// Cell `(i, j)` yields triangles `2 * (j * nx + i)` and `2 * (j * nx + i) + 1`,
/// which share the diagonal edge.
pub fn structured_grid(nx: usize, ny: usize, min: [f32; 2], max: [f32; 2]) -> MeshGenResult {
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    let dx = (max[0] - min[0]) / nx as f32;
    let dy = (max[1] - min[1]) / ny as f32;
    let mut positions = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        let y = min[1] + dy * j as f32;
        for i in 0..=nx {
            let x = min[0] + dx * i as f32;
            positions.push([x, y, 0.0]);
        }
    }

    let mut indices = Vec::with_capacity(6 * nx * ny);
    let row_stride = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * row_stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + row_stride;
            let v2 = v3 + 1;
            for v in [v0, v1, v2, v0, v2, v3] {
                indices.push(to_u32(v)?);
            }
        }
    }
    TriangleMesh::new(positions, indices)
}

/// Regular octahedron: 6 vertices, 8 faces, closed and manifold.
///
/// Face `f` uses the `+`/`-` pole on each axis according to bits 0, 1, 2 of
/// `f`; faces differing in one bit share an edge, so the face graph is a cube.
pub fn octahedron() -> MeshGenResult {
    let positions = vec![
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let mut indices = Vec::with_capacity(24);
    for f in 0..8u32 {
        indices.extend([f & 1, 2 + ((f >> 1) & 1), 4 + ((f >> 2) & 1)]);
    }
    TriangleMesh::new(positions, indices)
}

/// Surface of the cube `[-1, 1]³` with `n`×`n` cells per face.
///
/// Each face carries its own copy of the vertices on its border, so faces are
/// only connected through coincident positions, as with an importer that splits
/// vertices along hard edges.
pub fn cube_surface(n: usize) -> MeshGenResult {
    if n == 0 {
        return Err(invalid_geometry("cube_surface needs at least one cell per face"));
    }
    let coord = |k: usize| -1.0 + 2.0 * k as f32 / n as f32;
    let mut positions = Vec::with_capacity(6 * (n + 1) * (n + 1));
    let mut indices = Vec::with_capacity(36 * n * n);

    for axis in 0..3 {
        let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
        for side in [-1.0f32, 1.0] {
            let base = positions.len();
            for j in 0..=n {
                for i in 0..=n {
                    let mut p = [0.0f32; 3];
                    p[axis] = side;
                    p[u_axis] = coord(i);
                    p[v_axis] = coord(j);
                    positions.push(p);
                }
            }
            for j in 0..n {
                for i in 0..n {
                    let v0 = base + j * (n + 1) + i;
                    let v1 = v0 + 1;
                    let v3 = v0 + n + 1;
                    let v2 = v3 + 1;
                    for v in [v0, v1, v2, v0, v2, v3] {
                        indices.push(to_u32(v)?);
                    }
                }
            }
        }
    }
    TriangleMesh::new(positions, indices)
}

/// Give every triangle corner its own vertex, keeping positions.
///
/// Index-based connectivity disappears entirely; positional adjacency does not.
pub fn unweld(mesh: &TriangleMesh<u32>) -> MeshGenResult {
    let mut positions = Vec::with_capacity(3 * mesh.triangle_count());
    for t in 0..mesh.triangle_count() {
        positions.extend(mesh.triangle_positions(t));
    }
    let indices = (0..positions.len()).map(to_u32).collect::<Result<Vec<_>, _>>()?;
    TriangleMesh::new(positions, indices)
}
