//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the axis-aligned
//! direction each one points in. Face visibility, neighbor lookups and the
//! per-face texture mapping are all keyed by `BlockSide`.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a stable integer value used to index per-face
/// tables (corner offsets, texture cells, loaded-neighbor masks).
///
/// The order is: [UP, DOWN, NORTH, EAST, SOUTH, WEST]
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSide {
    /// Facing positive Y
    UP = 0,

    /// Facing negative Y
    DOWN = 1,

    /// Facing positive Z
    NORTH = 2,

    /// Facing positive X
    EAST = 3,

    /// Facing negative Z
    SOUTH = 4,

    /// Facing negative X
    WEST = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::UP,
            BlockSide::DOWN,
            BlockSide::NORTH,
            BlockSide::EAST,
            BlockSide::SOUTH,
            BlockSide::WEST,
        ]
    }

    /// Position of this side in per-face tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit offset from a block to its neighbor across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::UP => Vector3::new(0, 1, 0),
            BlockSide::DOWN => Vector3::new(0, -1, 0),
            BlockSide::NORTH => Vector3::new(0, 0, 1),
            BlockSide::EAST => Vector3::new(1, 0, 0),
            BlockSide::SOUTH => Vector3::new(0, 0, -1),
            BlockSide::WEST => Vector3::new(-1, 0, 0),
        }
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::UP => BlockSide::DOWN,
            BlockSide::DOWN => BlockSide::UP,
            BlockSide::NORTH => BlockSide::SOUTH,
            BlockSide::EAST => BlockSide::WEST,
            BlockSide::SOUTH => BlockSide::NORTH,
            BlockSide::WEST => BlockSide::EAST,
        }
    }
}
