//! Mesh data shared between compiled level geometry and loaded prop models
//!
//! A `MeshData` is an immutable vertex/index buffer. Source models are held
//! behind `Arc` so every spawned instance shares the same buffers; an
//! instance only carries its own texture binding and render flags.

use std::sync::Arc;

use crate::textures::TextureHandle;

/// A single vertex: position, outward normal, texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Triangle mesh geometry. Indices come in groups of three.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quad as two triangles.
    ///
    /// `corners` are in counter-clockwise order when viewed from the side
    /// the normal points toward. UVs pair with corners positionally.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            self.vertices.push(Vertex::new(*corner, normal, *uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if the mesh has no drawable geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

/// A renderable occurrence of a mesh on a scene node.
///
/// The mesh itself is shared; instances never mutate it.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    /// Shared source geometry.
    pub mesh: Arc<MeshData>,
    /// Texture to sample, if any (prop models bring their own materials).
    pub texture: Option<TextureHandle>,
    /// Render both faces of each triangle.
    pub two_sided: bool,
}

impl MeshInstance {
    pub fn new(mesh: Arc<MeshData>) -> Self {
        Self {
            mesh,
            texture: None,
            two_sided: false,
        }
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }
}
