//! # World Configuration
//!
//! Every tunable the engine reads lives in [`WorldConfig`]. It is built once,
//! validated, then shared immutably (behind an `Arc`) with the terrain
//! generator, the mesh builder and the world.
//!
//! ## Loading
//!
//! Configs are JSON documents. Every field is optional and falls back to its
//! default, so `{}` is a valid config and `{"seed": 42}` only changes the seed.
//!
//! ```
//! use voxel_world::config::WorldConfig;
//!
//! let config = WorldConfig::from_json_str(r#"{ "seed": 42, "render_distance": 1 }"#).unwrap();
//! assert_eq!(config.seed, 42);
//! assert_eq!(config.chunk_size, 16);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::block::registry::default_catalog;
use crate::engine_state::voxels::terrain::heightmap::NoiseSettings;
use crate::error::ConfigError;

/// Largest accepted chunk edge length. A chunk's block count must fit in `i32`.
pub const MAX_CHUNK_SIZE: i32 = 256;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk, in blocks.
    pub chunk_size: i32,
    /// Number of cells across the texture atlas.
    pub atlas_width: u32,
    /// Number of cells down the texture atlas.
    pub atlas_height: u32,
    /// Chebyshev radius, in chunks, kept loaded around the viewer.
    pub render_distance: i32,
    pub seed: u64,
    pub noise: NoiseSettings,
    /// Scales the normalized heightmap into a ground height in blocks.
    pub height_multiplier: f32,
    /// Columns whose ground is below this height are flooded up to it.
    pub water_height: i32,
    /// How many finished meshes the apply step installs per tick.
    pub applies_per_tick: usize,
    /// Block catalog. Ids are assigned in this order.
    pub block_types: Vec<BlockType>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            atlas_width: 4,
            atlas_height: 4,
            render_distance: 2,
            seed: 0,
            noise: NoiseSettings::default(),
            height_multiplier: 20.0,
            water_height: 10,
            applies_per_tick: 1,
            block_types: default_catalog(),
        }
    }
}

impl WorldConfig {
    /// Parses a config from JSON text. The result is not validated.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file. The result is not validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that the config describes a world the engine can run.
    ///
    /// A non-positive noise `scale` is accepted; the heightmap clamps it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size <= 0 {
            return Err(invalid("chunk_size", format!("must be positive, got {}", self.chunk_size)));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(invalid(
                "chunk_size",
                format!("must be at most {MAX_CHUNK_SIZE}, got {}", self.chunk_size),
            ));
        }
        if self.atlas_width == 0 {
            return Err(invalid("atlas_width", "must be positive".to_string()));
        }
        if self.atlas_height == 0 {
            return Err(invalid("atlas_height", "must be positive".to_string()));
        }
        if self.render_distance < 0 {
            return Err(invalid(
                "render_distance",
                format!("must not be negative, got {}", self.render_distance),
            ));
        }
        if self.noise.octaves <= 0 {
            return Err(invalid(
                "noise.octaves",
                format!("must be positive, got {}", self.noise.octaves),
            ));
        }
        if self.applies_per_tick == 0 {
            return Err(invalid("applies_per_tick", "must be positive".to_string()));
        }

        let mut names = HashSet::new();
        for block_type in &self.block_types {
            if !names.insert(block_type.name.as_str()) {
                return Err(ConfigError::DuplicateBlockType(block_type.name.clone()));
            }
            if let Some(cell) = block_type
                .faces
                .cells()
                .find(|cell| cell.u >= self.atlas_width || cell.v >= self.atlas_height)
            {
                return Err(invalid(
                    "block_types",
                    format!(
                        "`{}` maps a face to atlas cell [{}, {}] outside the {}x{} atlas",
                        block_type.name, cell.u, cell.v, self.atlas_width, self.atlas_height
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
