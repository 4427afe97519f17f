//! # Block Registry
//!
//! The block catalog, loaded from configuration. Ids are assigned in catalog
//! order and index straight into the registry.

use std::collections::HashMap;

use super::block_side::BlockSide;
use super::block_type::{AtlasCell, BlockType, BlockTypeId, FaceModel};
use super::BlockTypeSize;
use crate::error::ConfigError;

/// Immutable lookup table from [`BlockTypeId`] and name to [`BlockType`].
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    types: Vec<BlockType>,
    by_name: HashMap<String, BlockTypeId>,
}

impl BlockRegistry {
    /// Builds a registry from a catalog.
    ///
    /// # Arguments
    /// * `types` - Catalog entries; the first one gets id 0
    ///
    /// # Returns
    /// The registry, or an error if two entries share a name or the catalog
    /// does not fit in a [`BlockTypeId`].
    pub fn from_types(types: Vec<BlockType>) -> Result<Self, ConfigError> {
        if types.len() > BlockTypeSize::MAX as usize + 1 {
            return Err(ConfigError::Invalid {
                field: "block_types",
                reason: format!("{} entries exceed the id range", types.len()),
            });
        }

        let mut by_name = HashMap::with_capacity(types.len());
        for (index, block_type) in types.iter().enumerate() {
            let id = BlockTypeId(index as BlockTypeSize);
            if by_name.insert(block_type.name.clone(), id).is_some() {
                return Err(ConfigError::DuplicateBlockType(block_type.name.clone()));
            }
        }

        Ok(Self { types, by_name })
    }

    pub fn get(&self, id: BlockTypeId) -> Option<&BlockType> {
        self.types.get(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<BlockTypeId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockTypeId, &BlockType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, block_type)| (BlockTypeId(index as BlockTypeSize), block_type))
    }
}

/// The built-in catalog used when a config names no block types.
///
/// Atlas layout (cells are `[u, v]`):
/// grass top `[0, 0]`, grass side `[1, 0]`, dirt `[2, 0]`, stone `[3, 0]`,
/// sand `[0, 1]`, water `[1, 1]`.
pub fn default_catalog() -> Vec<BlockType> {
    let dirt = AtlasCell::new(2, 0);
    vec![
        BlockType::empty("empty"),
        BlockType::new(
            "grass",
            FaceModel::uniform(AtlasCell::new(1, 0))
                .with_face(BlockSide::UP, AtlasCell::new(0, 0))
                .with_face(BlockSide::DOWN, dirt),
        ),
        BlockType::new("dirt", FaceModel::uniform(dirt)),
        BlockType::new("stone", FaceModel::uniform(AtlasCell::new(3, 0))),
        BlockType::new("sand", FaceModel::uniform(AtlasCell::new(0, 1))),
        BlockType::new("water", FaceModel::uniform(AtlasCell::new(1, 1)))
            .transparent(true)
            .solid(false),
    ]
}
