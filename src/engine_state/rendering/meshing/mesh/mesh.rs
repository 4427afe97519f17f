//! Mesh data structures produced by the mesh builder.
//!
//! A chunk's geometry is split into two independent buffers. The render buffer
//! carries every visible face with its UVs. The collision buffer repeats only
//! the faces of solid blocks and is indexed on its own, so non-solid blocks
//! such as water are drawn but never collide. Neither buffer carries normals;
//! consumers derive them from the triangle winding.

use super::face::Face;

/// Vertices, UVs and triangle indices of every visible face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffer {
    pub vertices: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// Vertices and triangle indices of the visible faces of solid blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionBuffer {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Render and collision geometry of one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub render: RenderBuffer,
    pub collision: CollisionBuffer,
}

impl RenderBuffer {
    /// Appends a face's four vertices and two triangles.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.corners);
        self.uvs.extend_from_slice(&face.uvs);
        self.indices.extend_from_slice(&Face::indices(base));
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Vertex positions as raw bytes, for upload to a GPU buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl CollisionBuffer {
    /// Appends a face's four vertices and two triangles, indexed from this
    /// buffer's own vertex count.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.corners);
        self.indices.extend_from_slice(&Face::indices(base));
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl ChunkMesh {
    pub fn is_empty(&self) -> bool {
        self.render.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::{block_side::BlockSide, block_type::AtlasCell},
        coords::VoxelCoord,
    };

    fn face(side: BlockSide) -> Face {
        Face::new(VoxelCoord::new(0, 0, 0), side, AtlasCell::new(0, 0), (4, 4))
    }

    #[test]
    fn test_collision_is_indexed_independently() {
        let mut mesh = ChunkMesh::default();
        mesh.render.push_face(&face(BlockSide::UP));
        mesh.render.push_face(&face(BlockSide::DOWN));
        mesh.collision.push_face(&face(BlockSide::DOWN));

        assert_eq!(mesh.render.indices[6..], [4, 7, 5, 4, 6, 7]);
        assert_eq!(mesh.collision.indices, vec![0, 3, 1, 0, 2, 3]);
        assert_eq!(mesh.render.face_count(), 2);
        assert_eq!(mesh.collision.face_count(), 1);
    }

    #[test]
    fn test_byte_views_cover_buffers() {
        let mut mesh = ChunkMesh::default();
        mesh.render.push_face(&face(BlockSide::EAST));

        assert_eq!(mesh.render.vertex_bytes().len(), 4 * 3 * 4);
        assert_eq!(mesh.render.uv_bytes().len(), 4 * 2 * 4);
        assert_eq!(mesh.render.index_bytes().len(), 6 * 4);
        assert!(mesh.collision.vertex_bytes().is_empty());
    }
}
