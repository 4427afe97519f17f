//! Mesh generation data for voxel rendering and collision.
//!
//! # Architecture
//! - [`ChunkMesh`]: Render and collision buffers of one chunk
//! - [`Face`]: A single block face with its corners and atlas UVs

mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::{Face, UV_INSET};
pub use mesh::*;
