//! # World Module
//!
//! This module provides the `World` struct which owns every generated chunk.
//! It is the single source of truth for block data and answers the neighbor
//! and visibility queries the mesh builder asks.
//!
//! ## Architecture
//!
//! The world uses sparse storage: a map from chunk coordinate to chunk holding
//! only chunks that have been generated. Each coordinate maps to at most one
//! chunk. Blocks carry no links to each other; the neighbor of a block across
//! a face is whatever block the world holds at the adjacent position.
//!
//! ## Epochs
//!
//! `clear` drops every chunk and bumps the world's epoch. Pipeline results
//! produced against an older epoch are discarded by the engine.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::WorldConfig;
use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::block::registry::BlockRegistry;
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::coords::{ChunkCoord, VoxelCoord};

/// Represents a voxel world composed of multiple chunks.
pub struct World {
    config: Arc<WorldConfig>,
    registry: Arc<BlockRegistry>,
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkCoord, Chunk>,
    epoch: u64,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    /// * `config` - Shared engine configuration
    /// * `registry` - Block catalog the chunks' type ids refer to
    pub fn new(config: Arc<WorldConfig>, registry: Arc<BlockRegistry>) -> Self {
        World {
            config,
            registry,
            chunks: HashMap::new(),
            epoch: 0,
        }
    }

    pub fn config(&self) -> &Arc<WorldConfig> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn chunk_size(&self) -> i32 {
        self.config.chunk_size
    }

    /// Incremented by every [`World::clear`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Inserts a generated chunk if its coordinate is still free.
    ///
    /// # Returns
    /// `true` if the chunk was inserted, `false` if the coordinate was already taken
    /// (the existing chunk is kept).
    pub fn insert_chunk(&mut self, chunk: Chunk) -> bool {
        let coord = chunk.coord();
        if self.chunks.contains_key(&coord) {
            return false;
        }
        self.chunks.insert(coord, chunk);
        true
    }

    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Retrieves the chunk at the specified chunk coordinates, if generated.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_chunk_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.get(&coord).is_some_and(Chunk::is_loaded)
    }

    /// Coordinates of every loaded chunk.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks
            .values()
            .filter(|chunk| chunk.is_loaded())
            .map(Chunk::coord)
    }

    /// Which of a chunk's six neighbors are loaded, in [`BlockSide::all`] order.
    pub fn loaded_neighbors(&self, coord: ChunkCoord) -> [bool; 6] {
        coord.neighbors().map(|neighbor| self.is_chunk_loaded(neighbor))
    }

    /// Returns the block at an absolute position, or `None` if its chunk has
    /// not been generated.
    pub fn get_block(&self, voxel: VoxelCoord) -> Option<&Block> {
        self.chunks
            .get(&voxel.chunk(self.chunk_size()))
            .and_then(|chunk| chunk.get_block(voxel))
    }

    pub fn block_type(&self, block: &Block) -> Option<&BlockType> {
        self.registry.get(block.block_type)
    }

    /// The block across one face of the block at `voxel`.
    pub fn neighbor(&self, voxel: VoxelCoord, side: BlockSide) -> Option<&Block> {
        self.get_block(voxel.neighbor(side))
    }

    /// All six neighbors of the block at `voxel`, in [`BlockSide::all`] order.
    pub fn neighbors(&self, voxel: VoxelCoord) -> [Option<&Block>; 6] {
        BlockSide::all().map(|side| self.neighbor(voxel, side))
    }

    /// Whether the face of the block at `voxel` on `side` must be meshed.
    ///
    /// A face is visible when there is no neighbor on that side, when the
    /// neighbor's type is transparent, or when the neighbor lives in another
    /// chunk that is not loaded.
    pub fn is_face_visible(&self, voxel: VoxelCoord, side: BlockSide) -> bool {
        let neighbor_voxel = voxel.neighbor(side);
        let Some(neighbor) = self.get_block(neighbor_voxel) else {
            return true;
        };

        if self.block_type(neighbor).map_or(true, |t| t.transparent) {
            return true;
        }

        let size = self.chunk_size();
        let neighbor_chunk = neighbor_voxel.chunk(size);
        neighbor_chunk != voxel.chunk(size) && !self.is_chunk_loaded(neighbor_chunk)
    }

    /// Visibility of each face of the block at `voxel`, in [`BlockSide::all`] order.
    pub fn visible_faces(&self, voxel: VoxelCoord) -> [bool; 6] {
        BlockSide::all().map(|side| self.is_face_visible(voxel, side))
    }

    /// True if at least one face of the block at `voxel` is visible.
    pub fn is_block_visible(&self, voxel: VoxelCoord) -> bool {
        BlockSide::all()
            .into_iter()
            .any(|side| self.is_face_visible(voxel, side))
    }

    /// Height of the highest solid block in the column through `(x, z)`.
    ///
    /// Only generated chunks are searched. Returns -1 if none of the column's
    /// chunks is generated or none of them holds a solid block.
    pub fn ground_level(&self, x: i32, z: i32) -> i32 {
        let size = self.chunk_size();
        let column = VoxelCoord::new(x, 0, z).chunk(size);

        let mut column_chunks: Vec<&Chunk> = self
            .chunks
            .values()
            .filter(|chunk| chunk.coord().x == column.x && chunk.coord().z == column.z)
            .collect();
        column_chunks.sort_by_key(|chunk| std::cmp::Reverse(chunk.coord().y));

        for chunk in column_chunks {
            let origin = chunk.origin();
            for y in (origin.y..origin.y + size).rev() {
                let solid = chunk
                    .get_block(VoxelCoord::new(x, y, z))
                    .and_then(|block| self.block_type(block))
                    .is_some_and(|t| t.solid);
                if solid {
                    return y;
                }
            }
        }

        -1
    }

    /// Removes every chunk and starts a new epoch.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockTypeId;
    use crate::engine_state::voxels::block::registry::default_catalog;

    const EMPTY: BlockTypeId = BlockTypeId(0);
    const STONE: BlockTypeId = BlockTypeId(3);
    const WATER: BlockTypeId = BlockTypeId(5);

    fn world(chunk_size: i32) -> World {
        let config = WorldConfig {
            chunk_size,
            ..WorldConfig::default()
        };
        let registry = BlockRegistry::from_types(default_catalog()).unwrap();
        World::new(Arc::new(config), Arc::new(registry))
    }

    #[test]
    fn test_insert_keeps_first_chunk() {
        let mut world = world(2);
        assert!(world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 2, STONE)));
        assert!(!world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 2, WATER)));

        assert_eq!(world.chunk_count(), 1);
        assert_eq!(world.get_block(VoxelCoord::new(1, 1, 1)).unwrap().block_type, STONE);
    }

    #[test]
    fn test_absent_lookups_are_none() {
        let mut world = world(2);
        world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 2, STONE));

        assert!(world.get_block(VoxelCoord::new(2, 0, 0)).is_none());
        assert!(world.get_chunk(ChunkCoord::new(0, -1, 0)).is_none());
        assert!(world.neighbor(VoxelCoord::new(0, 0, 0), BlockSide::WEST).is_none());
    }

    #[test]
    fn test_neighbor_relation_is_symmetric() {
        let mut world = world(2);
        for coord in ChunkCoord::new(0, 0, 0).cube(1) {
            world.insert_chunk(Chunk::filled(coord, 2, STONE));
        }

        for chunk in world.chunks() {
            for block in chunk.blocks() {
                for side in BlockSide::all() {
                    if let Some(neighbor) = world.neighbor(block.position, side) {
                        let back = world.neighbor(neighbor.position, side.opposite()).unwrap();
                        assert_eq!(back.position, block.position);
                    }
                }
            }
        }
    }

    #[test]
    fn test_buried_block_is_hidden() {
        let mut world = world(4);
        world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 4, STONE));

        assert!(!world.is_block_visible(VoxelCoord::new(1, 1, 1)));
        assert!(!world.is_block_visible(VoxelCoord::new(2, 2, 1)));
    }

    #[test]
    fn test_missing_neighbor_exposes_one_face() {
        let mut world = world(4);
        world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 4, STONE));

        // Top middle block: nothing above it, since the chunk above is absent.
        let faces = world.visible_faces(VoxelCoord::new(1, 3, 1));
        assert_eq!(faces, [true, false, false, false, false, false]);
    }

    #[test]
    fn test_transparent_neighbor_exposes_face() {
        let mut world = world(4);
        let mut chunk = Chunk::filled(ChunkCoord::new(0, 0, 0), 4, STONE);
        chunk.set_block_type(VoxelCoord::new(2, 1, 1), WATER);
        chunk.set_block_type(VoxelCoord::new(1, 1, 2), EMPTY);
        world.insert_chunk(chunk);

        let faces = world.visible_faces(VoxelCoord::new(1, 1, 1));
        assert!(faces[BlockSide::EAST.index()]);
        assert!(faces[BlockSide::NORTH.index()]);
        assert_eq!(faces.iter().filter(|&&f| f).count(), 2);
    }

    #[test]
    fn test_unloaded_neighbor_chunk_exposes_boundary() {
        let mut world = world(2);
        world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 2, STONE));
        world.insert_chunk(Chunk::filled(ChunkCoord::new(1, 0, 0), 2, STONE));
        let boundary = VoxelCoord::new(1, 0, 0);

        assert!(world.is_face_visible(boundary, BlockSide::EAST));

        world.get_chunk_mut(ChunkCoord::new(1, 0, 0)).unwrap().mark_loaded();
        assert!(!world.is_face_visible(boundary, BlockSide::EAST));
        assert!(world.loaded_neighbors(ChunkCoord::new(0, 0, 0))[BlockSide::EAST.index()]);
    }

    #[test]
    fn test_ground_level_skips_water_and_empty() {
        let mut world = world(2);
        assert_eq!(world.ground_level(0, 0), -1);

        let mut lower = Chunk::filled(ChunkCoord::new(0, 0, 0), 2, STONE);
        lower.set_block_type(VoxelCoord::new(0, 1, 0), WATER);
        world.insert_chunk(lower);
        world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 1, 0), 2, EMPTY));

        assert_eq!(world.ground_level(0, 0), 0);
        assert_eq!(world.ground_level(1, 1), 1);
        assert_eq!(world.ground_level(5, 0), -1);
    }

    #[test]
    fn test_clear_bumps_epoch() {
        let mut world = world(2);
        world.insert_chunk(Chunk::filled(ChunkCoord::new(0, 0, 0), 2, STONE));
        world.clear();

        assert_eq!(world.chunk_count(), 0);
        assert_eq!(world.epoch(), 1);
    }
}
