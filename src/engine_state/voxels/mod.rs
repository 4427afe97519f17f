//! # Voxel Engine Core
//!
//! This module contains the world data model: positions, blocks, chunks,
//! terrain generation and the world that owns them.
//!
//! ## Architecture
//!
//! * **Coords**: Voxel and chunk coordinates and the conversions between them
//! * **Block**: Block records, block faces and the block-type catalog
//! * **Chunk**: Fixed-size dense arrays of blocks with a load/unload flag
//! * **Terrain**: Layered-noise heightmaps and per-voxel classification
//! * **World**: The chunk store, neighbor lookups and face visibility
//! * **Tasks**: Terrain generation as a pipeline task
//!
//! ## Data Flow
//!
//! 1. The generation worker turns a chunk coordinate into a populated chunk
//! 2. The owning thread inserts it into the world
//! 3. The build worker meshes it against the world
//! 4. Block mutations go through the world and trigger rebuilds of loaded chunks

pub mod block;
pub mod chunk;
pub mod coords;
pub mod tasks;
pub mod terrain;
pub mod world;
