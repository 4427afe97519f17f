//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which runs terrain generation
//! for one chunk on the generation worker. The task only reads the shared
//! generator; inserting the chunk into the world is left to the owning thread.

use std::sync::Arc;

use crate::{
    engine_state::{
        task_management::{pipeline::GeneratedChunk, task::Task},
        voxels::{coords::ChunkCoord, terrain::TerrainGenerator},
    },
    error::WorldError,
};

/// A task that generates chunk data asynchronously.
pub struct ChunkGenerationTask {
    /// Shared, immutable terrain generator
    generator: Arc<TerrainGenerator>,
    /// The position of the chunk to generate (in chunk coordinates)
    coord: ChunkCoord,
    /// World epoch the request was made in
    epoch: u64,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The terrain generator shared with the owning thread
    /// * `coord` - The chunk coordinates of the chunk to generate
    /// * `epoch` - Current world epoch, carried through to the result
    pub fn new(generator: Arc<TerrainGenerator>, coord: ChunkCoord, epoch: u64) -> Self {
        ChunkGenerationTask {
            generator,
            coord,
            epoch,
        }
    }
}

impl Task for ChunkGenerationTask {
    type Output = GeneratedChunk;
    type Key = (ChunkCoord, u64);

    fn key(&self) -> (ChunkCoord, u64) {
        (self.coord, self.epoch)
    }

    fn describe(&self) -> String {
        format!("generate chunk {}", self.coord)
    }

    fn process(self) -> Result<GeneratedChunk, WorldError> {
        let chunk = self.generator.generate_chunk(self.coord)?;
        Ok(GeneratedChunk {
            coord: self.coord,
            epoch: self.epoch,
            chunk,
        })
    }
}
