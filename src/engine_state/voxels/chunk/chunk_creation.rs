//! # Chunk Creation Module
//!
//! This module provides a builder that fills a chunk's dense block array one
//! voxel at a time, in storage order. Generators push one block type per voxel
//! and never compute an index themselves.

use crate::engine_state::voxels::{
    block::{block_type::BlockTypeId, Block},
    coords::{ChunkCoord, VoxelCoord},
};

use super::Chunk;

/// A builder for creating and populating chunks in storage order.
///
/// Blocks are pushed with X varying fastest, then Y, then Z, matching
/// [`Chunk::local_index`]. Each pushed block records its absolute position.
pub struct ChunkCreationIterator {
    /// The chunk coordinate of the chunk being created
    coord: ChunkCoord,
    /// Edge length of the chunk
    size: i32,
    /// Absolute position of the chunk's (0, 0, 0) corner
    origin: VoxelCoord,
    /// Blocks pushed so far
    blocks: Vec<Block>,
    /// Current X position within the chunk (0..size)
    local_x: i32,
    /// Current Y position within the chunk (0..size)
    local_y: i32,
    /// Current Z position within the chunk (0..size)
    local_z: i32,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given coordinate.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinate of the chunk to create
    /// * `size` - Edge length of the chunk in blocks
    pub fn new(coord: ChunkCoord, size: i32) -> Self {
        let volume = (size * size * size) as usize;
        ChunkCreationIterator {
            coord,
            size,
            origin: coord.origin(size),
            blocks: Vec::with_capacity(volume),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Absolute position of the voxel the next push will fill.
    pub fn position(&self) -> VoxelCoord {
        VoxelCoord::new(
            self.origin.x + self.local_x,
            self.origin.y + self.local_y,
            self.origin.z + self.local_z,
        )
    }

    /// True once every voxel of the chunk has been pushed.
    pub fn is_full(&self) -> bool {
        self.blocks.len() == (self.size * self.size * self.size) as usize
    }

    /// Finalizes the chunk creation and returns the constructed `Chunk`.
    ///
    /// Voxels that were never pushed are filled with `fill`, so the block array
    /// always holds exactly `size³` entries.
    pub fn return_chunk(mut self, fill: BlockTypeId) -> Chunk {
        while !self.is_full() {
            self.push_block_type(fill);
        }

        Chunk {
            coord: self.coord,
            size: self.size,
            blocks: self.blocks,
            loaded: false,
            scene: None,
        }
    }

    /// Adds a block at the current position and advances the position.
    ///
    /// Pushes past the end of the chunk are ignored.
    pub fn push_block_type(&mut self, block_type: BlockTypeId) {
        if self.is_full() {
            return;
        }

        self.blocks.push(Block::new(self.position(), block_type));

        self.local_x += 1;
        if self.local_x == self.size {
            self.local_x = 0;
            self.local_y += 1;

            if self.local_y == self.size {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_land_at_their_local_index() {
        let coord = ChunkCoord::new(1, -1, 0);
        let mut builder = ChunkCreationIterator::new(coord, 3);
        for i in 0..27 {
            builder.push_block_type(BlockTypeId(i));
        }
        let chunk = builder.return_chunk(BlockTypeId(0));

        for block in chunk.blocks() {
            let index = chunk.local_index(block.position).unwrap();
            assert_eq!(block.block_type, BlockTypeId(index as u16));
        }
        assert_eq!(chunk.blocks()[0].position, VoxelCoord::new(3, -3, 0));
    }

    #[test]
    fn test_short_fill_pads_to_full_volume() {
        let mut builder = ChunkCreationIterator::new(ChunkCoord::new(0, 0, 0), 4);
        builder.push_block_type(BlockTypeId(2));
        let chunk = builder.return_chunk(BlockTypeId(0));

        assert_eq!(chunk.blocks().len(), 64);
        assert_eq!(chunk.blocks()[0].block_type, BlockTypeId(2));
        assert_eq!(chunk.blocks()[63].block_type, BlockTypeId(0));
    }
}
