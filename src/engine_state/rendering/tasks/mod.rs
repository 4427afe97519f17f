//! Background tasks for rendering-related operations.
//!
//! Mesh building runs on the pipeline's build worker so the owning thread only
//! installs finished geometry.

pub mod chunk_mesh_generation_task;

pub use chunk_mesh_generation_task::ChunkMeshGenerationTask;
