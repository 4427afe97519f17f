//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. They run on
//! the pipeline's generation worker.

pub mod chunk_generation_task;

pub use chunk_generation_task::ChunkGenerationTask;
