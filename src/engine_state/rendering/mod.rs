//! Geometry side of the voxel engine.
//!
//! This module turns block data into chunk meshes and hands them to the scene
//! collaborator. Shader, material and window setup live outside the engine;
//! everything here is plain data.

pub mod meshing;
pub mod scene;
pub mod tasks;

pub use meshing::{ChunkMesh, MeshBuilder, MeshStamps, StampedMesh};
pub use scene::{ChunkScene, MemoryScene, SceneHandle};
