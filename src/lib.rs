#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world engine: layered-noise terrain, per-chunk face meshing
//! against a texture atlas, and a background pipeline that streams chunks in
//! and out around a moving viewer.
//!
//! ## Key Modules
//!
//! * `config` - Engine configuration and the block-type catalog
//! * `core` - Shared-resource utilities used across threads
//! * `engine_state` - The engine facade, voxels, meshing, streaming and task management
//! * `error` - Error types for configuration, generation and the engine
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Voxel data (coordinates, blocks, chunks, the world)
//! * Terrain generation (heightmaps and per-voxel classification)
//! * Meshing (visible faces into render and collision buffers)
//! * Task scheduling (generation and build workers, nearest-first apply)
//! * Presentation, which sits behind the `ChunkScene` trait
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::config::WorldConfig;
//! use voxel_world::engine_state::EngineState;
//! use voxel_world::engine_state::rendering::MemoryScene;
//! use web_time::Duration;
//!
//! voxel_world::init_logging();
//!
//! let config = WorldConfig { chunk_size: 8, render_distance: 1, ..WorldConfig::default() };
//! let mut engine = EngineState::new(config, MemoryScene::new()).unwrap();
//! engine.generate_world().unwrap();
//! engine.drain(Duration::from_secs(30));
//! ```

use log::info;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::WorldConfig;
pub use engine_state::{EngineState, ViewerEvent};
pub use error::{ConfigError, GeneratorError, WorldError};

/// Initializes stdout logging filtered by `RUST_LOG`.
///
/// Calling it more than once is harmless; later calls leave the first logger in place.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let initialized = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok();

    if initialized {
        info!("Logger initialized");
    }
}
