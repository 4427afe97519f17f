//! Mesh generation for voxel rendering and collision.
//!
//! This module converts a chunk's blocks into the geometry installed on its
//! scene object. It is plain data in, plain data out, so it runs on the build
//! worker as well as inline on the owning thread.
//!
//! # Algorithm
//! For every block of the chunk:
//! 1. Skip types whose face model is empty (air never produces geometry).
//! 2. Compute the six face visibilities from the world; skip the block if none
//!    is visible (buried blocks cost six lookups and nothing more).
//! 3. For each visible face with an atlas cell, append a quad to the render
//!    buffer, and to the collision buffer too if the type is solid.
//!
//! # Stamps
//! Builds can finish out of order. Every build taken through
//! [`MeshBuilder::build_stamped`] draws a number from [`MeshStamps`] while it
//! holds the world, and the engine never replaces an installed mesh with one
//! carrying a smaller stamp.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

mod mesh;

pub use mesh::*;

use crate::config::WorldConfig;
use crate::engine_state::voxels::{
    block::block_side::BlockSide,
    coords::ChunkCoord,
    world::World,
};

/// Builds [`ChunkMesh`]es from world data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuilder {
    atlas_width: u32,
    atlas_height: u32,
}

/// Shared, monotonically increasing counter ordering mesh builds.
#[derive(Debug, Clone, Default)]
pub struct MeshStamps(Arc<AtomicU64>);

impl MeshStamps {
    /// Draws the next stamp. Stamps start at 1.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// A mesh together with the world state it was built from.
#[derive(Debug, Clone)]
pub struct StampedMesh {
    pub coord: ChunkCoord,
    /// World epoch at build time.
    pub epoch: u64,
    pub stamp: u64,
    /// Loaded state of the six neighbor chunks at build time.
    pub loaded_neighbors: [bool; 6],
    pub mesh: ChunkMesh,
}

impl MeshBuilder {
    pub fn new(atlas_width: u32, atlas_height: u32) -> Self {
        Self {
            atlas_width,
            atlas_height,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.atlas_width, config.atlas_height)
    }

    /// Builds the geometry of one chunk.
    ///
    /// # Arguments
    /// * `world` - World holding the chunk and its neighbors
    /// * `coord` - Chunk to mesh
    ///
    /// # Returns
    /// The chunk's mesh, or `None` if the chunk has not been generated.
    pub fn build(&self, world: &World, coord: ChunkCoord) -> Option<ChunkMesh> {
        let chunk = world.get_chunk(coord)?;
        let registry = world.registry();
        let atlas = (self.atlas_width, self.atlas_height);
        let mut mesh = ChunkMesh::default();

        for block in chunk.blocks() {
            let Some(block_type) = registry.get(block.block_type) else {
                continue;
            };
            if block_type.faces.is_empty() {
                continue;
            }

            let visible = world.visible_faces(block.position);
            if !visible.contains(&true) {
                continue;
            }

            for side in BlockSide::all() {
                if !visible[side.index()] {
                    continue;
                }
                let Some(cell) = block_type.faces.cell(side) else {
                    continue;
                };

                let face = Face::new(block.position, side, cell, atlas);
                mesh.render.push_face(&face);
                if block_type.solid {
                    mesh.collision.push_face(&face);
                }
            }
        }

        Some(mesh)
    }

    /// Builds a chunk's mesh and records the state it was built against.
    ///
    /// The caller must hold the world for the whole call (a read guard is
    /// enough) so the stamp orders this build against concurrent mutations.
    pub fn build_stamped(
        &self,
        world: &World,
        coord: ChunkCoord,
        stamps: &MeshStamps,
    ) -> Option<StampedMesh> {
        let stamp = stamps.next();
        let mesh = self.build(world, coord)?;
        Some(StampedMesh {
            coord,
            epoch: world.epoch(),
            stamp,
            loaded_neighbors: world.loaded_neighbors(coord),
            mesh,
        })
    }
}
