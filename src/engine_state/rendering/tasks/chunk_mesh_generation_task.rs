//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask` which builds the render
//! and collision geometry of one chunk on the build worker. The task holds a
//! read guard on the world for the whole build, so the stamp it draws orders it
//! against mutations made by the owning thread.

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::{MeshBuilder, MeshStamps},
        task_management::{
            pipeline::{BuildCallback, BuildKind, BuiltChunk},
            task::Task,
        },
        voxels::{coords::ChunkCoord, world::World},
    },
    error::WorldError,
};

/// A task that generates mesh data for a chunk in a background thread.
pub struct ChunkMeshGenerationTask {
    /// Thread-safe reference to the world
    world: MtResource<World>,
    mesh_builder: MeshBuilder,
    stamps: MeshStamps,
    /// The chunk that needs mesh generation
    coord: ChunkCoord,
    kind: BuildKind,
    /// Invoked on the owning thread once the result is applied
    callback: Option<BuildCallback>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `world` - Thread-safe reference to the world
    /// * `mesh_builder` - Builder configured for the texture atlas
    /// * `stamps` - Shared stamp counter
    /// * `coord` - The chunk that needs mesh generation
    /// * `kind` - Whether applying the result loads the chunk or only refreshes it
    /// * `callback` - Optional completion callback
    pub fn new(
        world: MtResource<World>,
        mesh_builder: MeshBuilder,
        stamps: MeshStamps,
        coord: ChunkCoord,
        kind: BuildKind,
        callback: Option<BuildCallback>,
    ) -> Self {
        ChunkMeshGenerationTask {
            world,
            mesh_builder,
            stamps,
            coord,
            kind,
            callback,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    type Output = BuiltChunk;
    /// The chunk, and whether the build was requested without a callback.
    type Key = (ChunkCoord, bool);

    fn key(&self) -> (ChunkCoord, bool) {
        (self.coord, self.callback.is_none())
    }

    fn describe(&self) -> String {
        format!("{:?} build of chunk {}", self.kind, self.coord)
    }

    fn process(self) -> Result<BuiltChunk, WorldError> {
        let mesh = {
            let world = self.world.get();
            self.mesh_builder
                .build_stamped(&world, self.coord, &self.stamps)
        };

        Ok(BuiltChunk {
            coord: self.coord,
            kind: self.kind,
            mesh,
            callback: self.callback,
        })
    }
}
