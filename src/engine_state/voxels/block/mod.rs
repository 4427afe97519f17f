//! # Block Module
//!
//! This module provides the block-related functionality for the voxel engine:
//! the block record stored in chunks, block faces, and the block-type catalog.
//!
//! Blocks hold no references to their chunk or their neighbors. A neighbor is
//! found by asking the world for the block at `position + side.offset()`, so
//! the relation is symmetric by construction and absent while the neighboring
//! chunk has not been generated.

use block_type::BlockTypeId;

use super::coords::VoxelCoord;

pub mod block_side;
pub mod block_type;
pub mod registry;

/// The underlying integer type used to represent block type ids in memory.
pub type BlockTypeSize = u16;

/// Represents a single voxel block in the world.
///
/// This is a lightweight value record. The properties of the block (solidity,
/// transparency, textures) are looked up from its type in the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Absolute position of the block.
    pub position: VoxelCoord,
    pub block_type: BlockTypeId,
}

impl Block {
    /// Creates a new block of the specified type.
    ///
    /// # Arguments
    /// * `position` - Absolute position of the block
    /// * `block_type` - Catalog id of its type
    pub fn new(position: VoxelCoord, block_type: BlockTypeId) -> Self {
        Block {
            position,
            block_type,
        }
    }
}
