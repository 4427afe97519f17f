//! # Terrain Generation
//!
//! Turns a seed and noise settings into chunks of blocks.
//!
//! Each column's ground height is `floor(height_multiplier * noise(x, z))`. A
//! voxel's type then depends only on its height relative to the ground and to
//! the fixed water height:
//!
//! | Ground vs water | Voxel height                      | Type  |
//! |-----------------|-----------------------------------|-------|
//! | any             | `y > max(ground, water)`          | empty |
//! | above           | `y == ground`                     | grass |
//! | above           | `ground - 4 < y < ground`         | dirt  |
//! | level           | `ground - 4 < y <= ground`        | sand  |
//! | below           | `ground < y <= water`             | water |
//! | below           | `ground - 4 < y <= ground`        | sand  |
//! | any             | `y <= ground - 4`                 | stone |
//!
//! Generation is a pure function of the config and the chunk coordinate, so it
//! runs on the pipeline's generation worker without touching the world.

pub mod heightmap;

use std::sync::Arc;

use cgmath::Vector2;

use self::heightmap::{heightmap, Heightmap};
use super::block::block_type::BlockTypeId;
use super::block::registry::BlockRegistry;
use super::chunk::{Chunk, ChunkCreationIterator};
use super::coords::{ChunkCoord, VoxelCoord};
use crate::config::WorldConfig;
use crate::error::{ConfigError, GeneratorError};

/// Depth of the dirt (or sand) layer above stone.
const TOPSOIL_DEPTH: i32 = 4;

/// Ids of the block types the generator places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainPalette {
    pub empty: BlockTypeId,
    pub grass: BlockTypeId,
    pub dirt: BlockTypeId,
    pub stone: BlockTypeId,
    pub sand: BlockTypeId,
    pub water: BlockTypeId,
}

impl TerrainPalette {
    /// Looks up the terrain types by name.
    pub fn resolve(registry: &BlockRegistry) -> Result<Self, ConfigError> {
        let id = |name: &str| {
            registry
                .id_of(name)
                .ok_or_else(|| ConfigError::MissingBlockType(name.to_string()))
        };

        Ok(Self {
            empty: id("empty")?,
            grass: id("grass")?,
            dirt: id("dirt")?,
            stone: id("stone")?,
            sand: id("sand")?,
            water: id("water")?,
        })
    }
}

/// Deterministic chunk generator.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: Arc<WorldConfig>,
    palette: TerrainPalette,
}

impl TerrainGenerator {
    pub fn new(config: Arc<WorldConfig>, registry: &BlockRegistry) -> Result<Self, ConfigError> {
        let palette = TerrainPalette::resolve(registry)?;
        Ok(Self { config, palette })
    }

    pub fn palette(&self) -> &TerrainPalette {
        &self.palette
    }

    /// Ground height for a normalized noise value.
    pub fn ground_height(&self, noise: f32) -> i32 {
        (self.config.height_multiplier * noise).floor() as i32
    }

    /// Block type of a voxel at height `y` in a column whose ground is at `ground_height`.
    pub fn classify(&self, y: i32, ground_height: i32) -> BlockTypeId {
        let water_height = self.config.water_height;
        let palette = &self.palette;

        if y > ground_height.max(water_height) {
            return palette.empty;
        }
        if y <= ground_height - TOPSOIL_DEPTH {
            return palette.stone;
        }

        if ground_height > water_height {
            if y == ground_height {
                palette.grass
            } else {
                palette.dirt
            }
        } else if y > ground_height {
            palette.water
        } else {
            palette.sand
        }
    }

    /// The chunk-sized heightmap covering the chunk column at `(coord.x, coord.z)`.
    fn chunk_heightmap(&self, coord: ChunkCoord) -> Result<Heightmap, GeneratorError> {
        let size = self.config.chunk_size;
        let origin = coord.origin(size);
        heightmap(
            size as usize,
            size as usize,
            self.config.seed,
            &self.config.noise,
            Vector2::new(origin.x as f32, origin.z as f32),
        )
    }

    /// Ground height of the column through voxel `(x, z)`.
    pub fn column_height(&self, x: i32, z: i32) -> Result<i32, GeneratorError> {
        let size = self.config.chunk_size;
        let chunk = VoxelCoord::new(x, 0, z).chunk(size);
        let origin = chunk.origin(size);
        let map = self.chunk_heightmap(chunk)?;
        let noise = map
            .get((x - origin.x) as usize, (z - origin.z) as usize)
            .unwrap_or_default();
        Ok(self.ground_height(noise))
    }

    /// Generates every block of a chunk.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Result<Chunk, GeneratorError> {
        let size = self.config.chunk_size;
        let map = self.chunk_heightmap(coord)?;
        let grounds: Vec<i32> = map.values().iter().map(|&n| self.ground_height(n)).collect();

        let mut builder = ChunkCreationIterator::new(coord, size);
        while !builder.is_full() {
            let position = builder.position();
            let local_x = (position.x - coord.x * size) as usize;
            let local_z = (position.z - coord.z * size) as usize;
            // Heightmap rows run along z, columns along x.
            let ground = grounds[local_z * size as usize + local_x];
            builder.push_block_type(self.classify(position.y, ground));
        }

        Ok(builder.return_chunk(self.palette.empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::registry::default_catalog;

    fn generator(config: WorldConfig) -> TerrainGenerator {
        let registry = BlockRegistry::from_types(config.block_types.clone()).unwrap();
        TerrainGenerator::new(Arc::new(config), &registry).unwrap()
    }

    #[test]
    fn test_banding_example() {
        let config = WorldConfig {
            water_height: 10,
            height_multiplier: 20.0,
            ..WorldConfig::default()
        };
        let generator = generator(config);
        let palette = *generator.palette();

        let ground = generator.ground_height(0.5);
        assert_eq!(ground, 10);
        assert_eq!(generator.classify(10, ground), palette.sand);
        assert_eq!(generator.classify(5, ground), palette.stone);
        assert_eq!(generator.classify(11, ground), palette.empty);
    }

    #[test]
    fn test_classification_table() {
        let generator = generator(WorldConfig::default());
        let p = *generator.palette();

        // Ground above water at 15.
        assert_eq!(generator.classify(16, 15), p.empty);
        assert_eq!(generator.classify(15, 15), p.grass);
        assert_eq!(generator.classify(14, 15), p.dirt);
        assert_eq!(generator.classify(12, 15), p.dirt);
        assert_eq!(generator.classify(11, 15), p.stone);

        // Ground level with water at 10.
        assert_eq!(generator.classify(7, 10), p.sand);
        assert_eq!(generator.classify(6, 10), p.stone);

        // Ground below water at 6.
        assert_eq!(generator.classify(11, 6), p.empty);
        assert_eq!(generator.classify(10, 6), p.water);
        assert_eq!(generator.classify(7, 6), p.water);
        assert_eq!(generator.classify(6, 6), p.sand);
        assert_eq!(generator.classify(3, 6), p.sand);
        assert_eq!(generator.classify(2, 6), p.stone);
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = WorldConfig {
            chunk_size: 8,
            seed: 77,
            ..WorldConfig::default()
        };
        let a = generator(config.clone()).generate_chunk(ChunkCoord::new(1, 1, -2)).unwrap();
        let b = generator(config).generate_chunk(ChunkCoord::new(1, 1, -2)).unwrap();

        assert_eq!(a.blocks(), b.blocks());
        assert_eq!(a.blocks().len(), 512);
    }

    #[test]
    fn test_chunk_matches_column_heights() {
        let config = WorldConfig {
            chunk_size: 4,
            seed: 3,
            ..WorldConfig::default()
        };
        let generator = generator(config);
        let coord = ChunkCoord::new(-1, 0, 2);
        let chunk = generator.generate_chunk(coord).unwrap();

        for block in chunk.blocks() {
            let ground = generator.column_height(block.position.x, block.position.z).unwrap();
            assert_eq!(block.block_type, generator.classify(block.position.y, ground));
        }
    }

    #[test]
    fn test_missing_terrain_type() {
        let mut types = default_catalog();
        types.retain(|t| t.name != "sand");
        let registry = BlockRegistry::from_types(types).unwrap();

        assert!(matches!(
            TerrainPalette::resolve(&registry),
            Err(ConfigError::MissingBlockType(name)) if name == "sand"
        ));
    }

    #[test]
    fn test_bad_octaves_surface_from_generation() {
        let mut config = WorldConfig::default();
        config.noise.octaves = 0;
        let generator = generator(config);

        assert_eq!(
            generator.generate_chunk(ChunkCoord::new(0, 0, 0)).unwrap_err(),
            GeneratorError::NonPositiveOctaves { octaves: 0 }
        );
    }
}
