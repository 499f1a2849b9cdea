//! # Mesh — Static Geometry
//!
//! The samples draw exactly two shapes: a single triangle and a cube. Both
//! are generated on the CPU once, validated, packed with the variant's
//! [`VertexLayout`], and uploaded as immutable GPU buffers.
//!
//! ## Cube
//!
//! The cube is centered at the origin with side length 2. Each face has its
//! own four vertices (24 total) so that corner vertices can carry a different
//! normal per face. Every face gets the full `[0, 1]²` texture range, and each
//! of the eight corners has a fixed color shared by the three faces meeting
//! there.
//!
//! ## Winding
//!
//! For every triangle `(a, b, c)`, `(b - a) × (c - a)` points out of the
//! shape. Under the left-handed camera that makes outward faces appear
//! clockwise on screen, which is what the pipeline treats as front-facing.
//! The triangle follows the same rule and faces the camera.

use wgpu::util::DeviceExt;

use super::vertex::{Vertex, VertexLayout};
use crate::error::{RenderError, RenderResult};

/// Half the cube's side length.
const CUBE_HALF_EXTENT: f32 = 1.0;

/// Vertices plus optional triangle indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Single triangle in clip space, facing the viewer.
    pub fn triangle() -> Self {
        Self {
            vertices: vec![
                Vertex::from_position([0.0, 0.5, 0.5]),
                Vertex::from_position([0.5, -0.5, 0.5]),
                Vertex::from_position([-0.5, -0.5, 0.5]),
            ],
            indices: Vec::new(),
        }
    }

    /// Cube with per-face normals, per-face UVs, and per-corner colors.
    ///
    /// Returns 24 vertices (4 per face) and 36 indices.
    pub fn cube() -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // (normal, u_dir, v_dir) with u_dir × v_dir == normal
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // +Y (top)
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            // -Y (bottom)
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            // -X (left)
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            // +X (right)
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            // -Z (back)
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            // +Z (front)
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        // Corner offsets along (u_dir, v_dir) and their texture coordinates.
        let corners: [([f32; 2], [f32; 2]); 4] = [
            ([-1.0, -1.0], [0.0, 1.0]),
            ([1.0, -1.0], [1.0, 1.0]),
            ([1.0, 1.0], [1.0, 0.0]),
            ([-1.0, 1.0], [0.0, 0.0]),
        ];

        let h = CUBE_HALF_EXTENT;
        for (normal, u_dir, v_dir) in &faces {
            let base = vertices.len() as u32;

            for (offset, tex_coord) in &corners {
                let position = std::array::from_fn(|axis| {
                    normal[axis] * h + u_dir[axis] * offset[0] * h + v_dir[axis] * offset[1] * h
                });
                vertices.push(Vertex {
                    position,
                    normal: *normal,
                    tex_coord: *tex_coord,
                    color: corner_color(position),
                });
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Whether the mesh is drawn through its index list.
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of elements a draw call covers: indices if present, else vertices.
    pub fn element_count(&self) -> u32 {
        if self.is_indexed() {
            self.indices.len() as u32
        } else {
            self.vertices.len() as u32
        }
    }

    /// Check that the mesh describes whole triangles and that every index
    /// refers to an existing vertex.
    pub fn validate(&self) -> RenderResult<()> {
        if self.vertices.is_empty() {
            return Err(RenderError::InvalidMesh("mesh has no vertices".into()));
        }
        if self.element_count() % 3 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "{} elements do not form whole triangles",
                self.element_count()
            )));
        }
        if let Some(&bad) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(RenderError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                self.vertices.len()
            )));
        }
        Ok(())
    }
}

/// Fixed color for each of the cube's eight corners.
fn corner_color(position: [f32; 3]) -> [f32; 4] {
    let top = position[1] > 0.0;
    let right = position[0] > 0.0;
    let front = position[2] > 0.0;
    let rgb = match (top, right, front) {
        (true, false, false) => [0.0, 0.0, 1.0],
        (true, true, false) => [0.0, 1.0, 0.0],
        (true, true, true) => [0.0, 1.0, 1.0],
        (true, false, true) => [1.0, 0.0, 0.0],
        (false, false, false) => [1.0, 0.0, 1.0],
        (false, true, false) => [1.0, 1.0, 0.0],
        (false, true, true) => [1.0, 1.0, 1.0],
        (false, false, true) => [0.0, 0.0, 0.0],
    };
    [rgb[0], rgb[1], rgb[2], 1.0]
}

/// A mesh that has been uploaded to GPU buffers.
pub(crate) struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub element_count: u32,
}

impl GpuMesh {
    /// Pack the mesh with `layout` and upload it as immutable buffers.
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, layout: VertexLayout) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertex buffer"),
            contents: &layout.pack(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = mesh.is_indexed().then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh index buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::debug!(
            "Uploaded mesh: {} vertices ({} bytes each), {} indices",
            mesh.vertices.len(),
            layout.stride(),
            mesh.indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            element_count: mesh.element_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn position(mesh: &Mesh, index: u32) -> Vec3 {
        Vec3::from(mesh.vertices[index as usize].position)
    }

    #[test]
    fn cube_has_correct_counts() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24, "cube should have 24 vertices (4 per face)");
        assert_eq!(cube.indices.len(), 36, "cube should have 36 indices (6 per face)");
        assert_eq!(cube.element_count(), 36);
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn cube_triangles_wind_outward() {
        let cube = Mesh::cube();
        let mut faces_seen = Vec::new();

        for tri in cube.indices.chunks_exact(3) {
            let (a, b, c) = (position(&cube, tri[0]), position(&cube, tri[1]), position(&cube, tri[2]));
            let geometric = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            let normal = Vec3::from(cube.vertices[tri[0] as usize].normal);

            assert!(geometric.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
            assert!(geometric.normalize().abs_diff_eq(normal, 1e-6));
            if !faces_seen.contains(&normal.to_array().map(|x| x as i32)) {
                faces_seen.push(normal.to_array().map(|x| x as i32));
            }
        }

        assert_eq!(faces_seen.len(), 6, "every face should be covered");
    }

    #[test]
    fn cube_spans_two_units() {
        let cube = Mesh::cube();
        for v in &cube.vertices {
            for c in v.position {
                assert_eq!(c.abs(), 1.0);
            }
        }
    }

    #[test]
    fn cube_corners_share_colors_across_faces() {
        let cube = Mesh::cube();
        for a in &cube.vertices {
            for b in &cube.vertices {
                if a.position == b.position {
                    assert_eq!(a.color, b.color);
                }
            }
        }
    }

    #[test]
    fn cube_normals_are_unit_length() {
        for v in &Mesh::cube().vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn triangle_is_three_unindexed_vertices() {
        let tri = Mesh::triangle();
        assert_eq!(tri.vertices.len(), 3);
        assert!(tri.indices.is_empty());
        assert!(!tri.is_indexed());
        assert_eq!(tri.element_count(), 3);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn triangle_faces_the_viewer() {
        let tri = Mesh::triangle();
        let (a, b, c) = (position(&tri, 0), position(&tri, 1), position(&tri, 2));
        // Left-handed: toward the viewer is -Z.
        assert!((b - a).cross(c - a).z < 0.0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut mesh = Mesh::cube();
        mesh.indices[5] = 24;
        assert!(matches!(mesh.validate(), Err(RenderError::InvalidMesh(_))));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mut mesh = Mesh::cube();
        mesh.indices.pop();
        assert!(matches!(mesh.validate(), Err(RenderError::InvalidMesh(_))));
    }
}
