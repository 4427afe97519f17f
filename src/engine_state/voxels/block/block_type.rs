//! # Block Type Module
//!
//! This module defines the catalog entries blocks refer to. A `BlockType` is
//! loaded once from configuration and never changes afterwards; blocks only
//! store its compact [`BlockTypeId`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::block_side::BlockSide;
use super::BlockTypeSize;

/// Index of a block type in the [`BlockRegistry`](super::registry::BlockRegistry).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockTypeId(pub BlockTypeSize);

impl fmt::Display for BlockTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell of the texture atlas, counted in cells from the atlas origin.
///
/// Serialized as a two-element array `[u, v]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AtlasCell {
    pub u: u32,
    pub v: u32,
}

impl AtlasCell {
    pub const fn new(u: u32, v: u32) -> Self {
        Self { u, v }
    }
}

impl From<[u32; 2]> for AtlasCell {
    fn from([u, v]: [u32; 2]) -> Self {
        Self { u, v }
    }
}

impl From<AtlasCell> for [u32; 2] {
    fn from(cell: AtlasCell) -> Self {
        [cell.u, cell.v]
    }
}

/// Maps each face of a block to the atlas cell drawn on it.
///
/// Faces without a cell are never meshed, so a type with an empty model (air)
/// produces no geometry at all. In config files the model is an object keyed by
/// side name: `{ "up": [0, 0], "down": [2, 0] }`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<BlockSide, AtlasCell>",
    into = "BTreeMap<BlockSide, AtlasCell>"
)]
pub struct FaceModel {
    cells: [Option<AtlasCell>; 6],
}

impl FaceModel {
    /// A model drawing the same cell on all six faces.
    pub fn uniform(cell: AtlasCell) -> Self {
        Self {
            cells: [Some(cell); 6],
        }
    }

    /// Replaces the cell of one face.
    pub fn with_face(mut self, side: BlockSide, cell: AtlasCell) -> Self {
        self.cells[side.index()] = Some(cell);
        self
    }

    /// Returns the cell drawn on the given face, if any.
    pub fn cell(&self, side: BlockSide) -> Option<AtlasCell> {
        self.cells[side.index()]
    }

    /// True if no face has a cell.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Every mapped cell.
    pub fn cells(&self) -> impl Iterator<Item = AtlasCell> + '_ {
        self.cells.iter().flatten().copied()
    }
}

impl From<BTreeMap<BlockSide, AtlasCell>> for FaceModel {
    fn from(map: BTreeMap<BlockSide, AtlasCell>) -> Self {
        let mut model = FaceModel::default();
        for (side, cell) in map {
            model.cells[side.index()] = Some(cell);
        }
        model
    }
}

impl From<FaceModel> for BTreeMap<BlockSide, AtlasCell> {
    fn from(model: FaceModel) -> Self {
        BlockSide::all()
            .into_iter()
            .filter_map(|side| model.cell(side).map(|cell| (side, cell)))
            .collect()
    }
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockType {
    pub name: String,
    /// Solid types contribute collision geometry.
    #[serde(default = "default_solid")]
    pub solid: bool,
    /// Transparent types never hide the faces of the blocks next to them.
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub faces: FaceModel,
}

fn default_solid() -> bool {
    true
}

impl BlockType {
    /// An opaque, solid type.
    pub fn new(name: impl Into<String>, faces: FaceModel) -> Self {
        Self {
            name: name.into(),
            solid: true,
            transparent: false,
            faces,
        }
    }

    /// A type with no faces that neither hides nor collides (air).
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solid: false,
            transparent: true,
            faces: FaceModel::default(),
        }
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }
}
