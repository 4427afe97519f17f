//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cube of blocks that is
//! the unit of generation, meshing and streaming.
//!
//! ## Storage
//!
//! A chunk owns a dense array of exactly `size³` blocks, stored with X varying
//! fastest, then Y, then Z:
//!
//! `index = x + size * y + size² * z`
//!
//! The array length and the chunk's bounds never change after construction;
//! mutation only replaces block types in place.
//!
//! ## Lifecycle
//!
//! A chunk is created unloaded. `mark_loaded` / `mark_unloaded` flip the flag
//! and report whether anything changed, so repeated loads and unloads are
//! no-ops for the caller.

pub use chunk_creation::ChunkCreationIterator;

use super::block::block_type::BlockTypeId;
use super::block::Block;
use super::coords::{ChunkCoord, VoxelCoord};
use crate::engine_state::rendering::scene::SceneHandle;

mod chunk_creation;

/// A `size × size × size` collection of blocks.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    coord: ChunkCoord,
    /// Edge length in blocks.
    size: i32,
    /// Every block of the chunk, in storage order.
    blocks: Vec<Block>,
    /// True while the chunk's geometry is installed and active.
    loaded: bool,
    /// Scene object attached by the owning thread when the chunk enters the world.
    scene: Option<SceneHandle>,
}

impl Chunk {
    /// Creates a chunk with every block set to one type.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `size` - Edge length in blocks
    /// * `block_type` - Type given to every block
    pub fn filled(coord: ChunkCoord, size: i32, block_type: BlockTypeId) -> Self {
        ChunkCreationIterator::new(coord, size).return_chunk(block_type)
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Absolute position of the chunk's (0, 0, 0) corner.
    pub fn origin(&self) -> VoxelCoord {
        self.coord.origin(self.size)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn scene(&self) -> Option<SceneHandle> {
        self.scene
    }

    pub fn attach_scene(&mut self, handle: SceneHandle) {
        self.scene = Some(handle);
    }

    /// Index of a voxel in the block array, or `None` if it lies outside this chunk.
    pub fn local_index(&self, voxel: VoxelCoord) -> Option<usize> {
        let origin = self.origin();
        let (x, y, z) = (voxel.x - origin.x, voxel.y - origin.y, voxel.z - origin.z);
        let bounds = 0..self.size;
        if !(bounds.contains(&x) && bounds.contains(&y) && bounds.contains(&z)) {
            return None;
        }

        Some((x + self.size * y + self.size * self.size * z) as usize)
    }

    /// Returns the block at an absolute position, or `None` if it lies outside this chunk.
    pub fn get_block(&self, voxel: VoxelCoord) -> Option<&Block> {
        self.local_index(voxel).map(|index| &self.blocks[index])
    }

    /// Replaces the type of the block at an absolute position.
    ///
    /// # Returns
    /// `true` if the block exists in this chunk and its type changed.
    pub fn set_block_type(&mut self, voxel: VoxelCoord, block_type: BlockTypeId) -> bool {
        match self.local_index(voxel) {
            Some(index) if self.blocks[index].block_type != block_type => {
                self.blocks[index].block_type = block_type;
                true
            }
            _ => false,
        }
    }

    /// Marks the chunk loaded. Returns `false` if it already was.
    pub fn mark_loaded(&mut self) -> bool {
        !std::mem::replace(&mut self.loaded, true)
    }

    /// Marks the chunk unloaded. Returns `false` if it already was.
    pub fn mark_unloaded(&mut self) -> bool {
        std::mem::replace(&mut self.loaded, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_chunk_has_full_volume() {
        let chunk = Chunk::filled(ChunkCoord::new(0, 0, 0), 4, BlockTypeId(3));

        assert_eq!(chunk.blocks().len(), 64);
        assert!(chunk.blocks().iter().all(|b| b.block_type == BlockTypeId(3)));
        assert!(!chunk.is_loaded());
    }

    #[test]
    fn test_lookup_respects_bounds() {
        let chunk = Chunk::filled(ChunkCoord::new(-1, 0, 2), 4, BlockTypeId(1));

        assert!(chunk.get_block(VoxelCoord::new(-4, 0, 8)).is_some());
        assert!(chunk.get_block(VoxelCoord::new(-1, 3, 11)).is_some());
        assert!(chunk.get_block(VoxelCoord::new(0, 0, 8)).is_none());
        assert!(chunk.get_block(VoxelCoord::new(-4, -1, 8)).is_none());
        assert_eq!(
            chunk.get_block(VoxelCoord::new(-2, 1, 9)).map(|b| b.position),
            Some(VoxelCoord::new(-2, 1, 9))
        );
    }

    #[test]
    fn test_set_block_type_reports_change() {
        let mut chunk = Chunk::filled(ChunkCoord::new(0, 0, 0), 2, BlockTypeId(0));
        let voxel = VoxelCoord::new(1, 1, 0);

        assert!(chunk.set_block_type(voxel, BlockTypeId(2)));
        assert!(!chunk.set_block_type(voxel, BlockTypeId(2)));
        assert!(!chunk.set_block_type(VoxelCoord::new(2, 0, 0), BlockTypeId(2)));
        assert_eq!(chunk.get_block(voxel).unwrap().block_type, BlockTypeId(2));
        assert_eq!(chunk.blocks().len(), 8);
    }

    #[test]
    fn test_load_and_unload_are_idempotent() {
        let mut chunk = Chunk::filled(ChunkCoord::new(0, 0, 0), 2, BlockTypeId(0));

        assert!(chunk.mark_loaded());
        assert!(!chunk.mark_loaded());
        assert!(chunk.is_loaded());
        assert!(chunk.mark_unloaded());
        assert!(!chunk.mark_unloaded());
        assert!(!chunk.is_loaded());
    }
}
