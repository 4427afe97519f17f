//! # Error Types
//!
//! Errors reported by configuration loading, terrain generation and world
//! mutation. Lookups of absent blocks or chunks are never errors; they return
//! `None`.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockTypeId;

/// Errors raised while loading or validating a [`WorldConfig`](crate::config::WorldConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid JSON for a world config.
    #[error("failed to parse world config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the engine cannot work with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Two catalog entries share a name.
    #[error("duplicate block type name `{0}`")]
    DuplicateBlockType(String),

    /// Terrain generation needs a block type the catalog does not define.
    #[error("block type `{0}` is required by terrain generation but missing from the catalog")]
    MissingBlockType(String),
}

/// Errors raised by the heightmap generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("heightmap needs at least one octave, got {octaves}")]
    NonPositiveOctaves { octaves: i32 },
}

/// Errors surfaced by the engine facade and pipeline jobs.
#[derive(Error, Debug)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// A mutation named a block type id outside the catalog.
    #[error("unknown block type id {0}")]
    UnknownBlockType(BlockTypeId),

    /// The operating system refused to start a pipeline worker thread.
    #[error("failed to spawn pipeline worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
