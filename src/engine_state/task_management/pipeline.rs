//! # Chunk Pipeline
//!
//! Three stages turn a chunk coordinate into installed geometry:
//!
//! - **Generation**: one worker runs terrain generation, FIFO.
//! - **Build**: one worker runs the mesh builder against the shared world, FIFO.
//! - **Apply**: the owning thread pops finished builds from the [`ApplyQueue`],
//!   nearest to the viewer first.
//!
//! The pipeline only moves data between those stages. Deciding what a result
//! means (insert, install, load) is the engine's job.
//!
//! Requests are deduplicated while in flight: a coordinate is generated at
//! most once per request round, and a callback-free build of a chunk that is
//! already queued is dropped because the queued build has not read the world
//! yet or will be re-checked when it is applied. A job that fails releases its
//! reservation, so the coordinate can be requested again.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use super::TaskWorker;
use crate::core::MtResource;
use crate::engine_state::rendering::meshing::{MeshBuilder, MeshStamps, StampedMesh};
use crate::engine_state::rendering::tasks::ChunkMeshGenerationTask;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::coords::ChunkCoord;
use crate::engine_state::voxels::tasks::ChunkGenerationTask;
use crate::engine_state::voxels::terrain::TerrainGenerator;
use crate::engine_state::voxels::world::World;
use crate::error::WorldError;

/// Completion callback of a build, invoked on the owning thread when the
/// result is applied.
pub type BuildCallback = Box<dyn FnOnce(ChunkCoord) + Send>;

/// What applying a build result does to its chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    /// First mesh of a freshly generated chunk; applying it loads the chunk.
    Load,
    /// Refresh of a chunk that is already loaded.
    Rebuild,
}

/// Output of the generation stage.
#[derive(Debug)]
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    /// World epoch the request was made in.
    pub epoch: u64,
    pub chunk: Chunk,
}

/// Output of the build stage.
pub struct BuiltChunk {
    pub coord: ChunkCoord,
    pub kind: BuildKind,
    /// `None` if the chunk was gone from the world when the build ran.
    pub mesh: Option<StampedMesh>,
    pub callback: Option<BuildCallback>,
}

impl fmt::Debug for BuiltChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltChunk")
            .field("coord", &self.coord)
            .field("kind", &self.kind)
            .field("stamp", &self.mesh.as_ref().map(|mesh| mesh.stamp))
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Finished builds waiting to be applied.
///
/// Entries are consumed nearest-first by Chebyshev distance to the viewer's
/// chunk; entries at equal distance come out in arrival order.
#[derive(Debug, Default)]
pub struct ApplyQueue {
    pending: Vec<BuiltChunk>,
}

impl ApplyQueue {
    pub fn push(&mut self, built: BuiltChunk) {
        self.pending.push(built);
    }

    /// Removes and returns the entry closest to `viewer`.
    pub fn pop_nearest(&mut self, viewer: ChunkCoord) -> Option<BuiltChunk> {
        let mut nearest: Option<(usize, i32)> = None;
        for (index, built) in self.pending.iter().enumerate() {
            let distance = built.coord.chebyshev_distance(viewer);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
        }

        let (index, distance) = nearest?;
        trace!(
            "Applying chunk {} at distance {distance} ({} pending)",
            self.pending[index].coord,
            self.pending.len() - 1
        );
        Some(self.pending.remove(index))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Snapshot of the pipeline's queues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub generations_in_flight: usize,
    pub builds_in_flight: usize,
    pub pending_applies: usize,
    pub failed_jobs: usize,
}

/// The generation and build workers plus the apply queue.
pub struct ChunkPipeline {
    world: MtResource<World>,
    generator: Arc<TerrainGenerator>,
    mesh_builder: MeshBuilder,
    stamps: MeshStamps,
    generation: TaskWorker<ChunkGenerationTask>,
    build: TaskWorker<ChunkMeshGenerationTask>,
    /// Coordinates whose generation has been requested but not collected,
    /// with the epoch of the request.
    requested: HashMap<ChunkCoord, u64>,
    /// Coordinates with a callback-free build queued but not collected.
    queued_builds: HashSet<ChunkCoord>,
    apply_queue: ApplyQueue,
}

impl ChunkPipeline {
    /// Starts both workers.
    ///
    /// # Arguments
    /// * `world` - World the build worker reads
    /// * `generator` - Generator the generation worker runs
    /// * `mesh_builder` - Builder the build worker runs
    /// * `stamps` - Stamp counter shared with inline builds on the owning thread
    pub fn new(
        world: MtResource<World>,
        generator: Arc<TerrainGenerator>,
        mesh_builder: MeshBuilder,
        stamps: MeshStamps,
    ) -> Result<Self, WorldError> {
        Ok(Self {
            world,
            generator,
            mesh_builder,
            stamps,
            generation: TaskWorker::new("chunk-generation")?,
            build: TaskWorker::new("chunk-build")?,
            requested: HashMap::new(),
            queued_builds: HashSet::new(),
            apply_queue: ApplyQueue::default(),
        })
    }

    /// Queues generation of a chunk.
    ///
    /// # Returns
    /// `false` if that coordinate is already being generated.
    pub fn request_generation(&mut self, coord: ChunkCoord, epoch: u64) -> bool {
        if self.requested.contains_key(&coord) {
            return false;
        }

        let task = ChunkGenerationTask::new(self.generator.clone(), coord, epoch);
        if !self.generation.publish(task) {
            return false;
        }
        debug!("Requested generation of chunk {coord}");
        self.requested.insert(coord, epoch);
        true
    }

    /// Queues a mesh build of a chunk.
    ///
    /// # Returns
    /// `false` if the request was merged into an already queued build.
    pub fn request_build(
        &mut self,
        coord: ChunkCoord,
        kind: BuildKind,
        callback: Option<BuildCallback>,
    ) -> bool {
        let dedupe = callback.is_none();
        if dedupe && self.queued_builds.contains(&coord) {
            trace!("Build of chunk {coord} already queued");
            return false;
        }

        let task = ChunkMeshGenerationTask::new(
            self.world.clone(),
            self.mesh_builder,
            self.stamps.clone(),
            coord,
            kind,
            callback,
        );
        if !self.build.publish(task) {
            return false;
        }
        debug!("Requested {kind:?} build of chunk {coord}");
        if dedupe {
            self.queued_builds.insert(coord);
        }
        true
    }

    /// Takes every finished generation result.
    ///
    /// Failed generations are dropped here and their coordinates released.
    pub fn collect_generated(&mut self) -> Vec<GeneratedChunk> {
        let collected = self.generation.collect();
        for (coord, epoch) in collected.failed {
            self.release_generation(coord, epoch);
        }
        for result in &collected.completed {
            self.release_generation(result.coord, result.epoch);
        }
        collected.completed
    }

    /// Forgets a generation request, unless a newer request for the same
    /// coordinate has replaced it.
    fn release_generation(&mut self, coord: ChunkCoord, epoch: u64) {
        if self.requested.get(&coord) == Some(&epoch) {
            self.requested.remove(&coord);
        }
    }

    /// Moves every finished build into the apply queue.
    ///
    /// # Returns
    /// The number of builds collected.
    pub fn collect_built(&mut self) -> usize {
        let collected = self.build.collect();
        for (coord, merged) in collected.failed {
            if merged {
                self.queued_builds.remove(&coord);
            }
        }

        let count = collected.completed.len();
        for result in collected.completed {
            if result.callback.is_none() {
                self.queued_builds.remove(&result.coord);
            }
            self.apply_queue.push(result);
        }
        count
    }

    /// Removes the pending build nearest to `viewer`.
    pub fn pop_nearest(&mut self, viewer: ChunkCoord) -> Option<BuiltChunk> {
        self.apply_queue.pop_nearest(viewer)
    }

    pub fn is_generation_requested(&self, coord: ChunkCoord) -> bool {
        self.requested.contains_key(&coord)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            generations_in_flight: self.generation.in_flight(),
            builds_in_flight: self.build.in_flight(),
            pending_applies: self.apply_queue.len(),
            failed_jobs: self.generation.failed() + self.build.failed(),
        }
    }

    /// True when nothing is in flight and nothing waits to be applied.
    pub fn is_idle(&self) -> bool {
        self.generation.in_flight() == 0 && self.build.in_flight() == 0 && self.apply_queue.is_empty()
    }

    /// Forgets every request and pending result.
    ///
    /// Jobs already handed to a worker still run; their results carry the old
    /// epoch and are discarded when collected.
    pub fn clear(&mut self) {
        self.requested.clear();
        self.queued_builds.clear();
        self.apply_queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(coord: ChunkCoord) -> BuiltChunk {
        BuiltChunk {
            coord,
            kind: BuildKind::Load,
            mesh: None,
            callback: None,
        }
    }

    #[test]
    fn test_nearest_entry_wins_over_arrival_order() {
        let mut queue = ApplyQueue::default();
        let viewer = ChunkCoord::new(0, 0, 0);
        queue.push(built(ChunkCoord::new(3, 0, 0)));
        queue.push(built(ChunkCoord::new(0, 1, 0)));

        assert_eq!(queue.pop_nearest(viewer).unwrap().coord, ChunkCoord::new(0, 1, 0));
        assert_eq!(queue.pop_nearest(viewer).unwrap().coord, ChunkCoord::new(3, 0, 0));
        assert!(queue.pop_nearest(viewer).is_none());
    }

    #[test]
    fn test_equal_distance_keeps_arrival_order() {
        let mut queue = ApplyQueue::default();
        let viewer = ChunkCoord::new(5, 5, 5);
        queue.push(built(ChunkCoord::new(6, 5, 5)));
        queue.push(built(ChunkCoord::new(4, 4, 4)));
        queue.push(built(ChunkCoord::new(5, 6, 5)));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_nearest(viewer))
            .map(|b| b.coord)
            .collect();
        assert_eq!(
            order,
            vec![
                ChunkCoord::new(6, 5, 5),
                ChunkCoord::new(4, 4, 4),
                ChunkCoord::new(5, 6, 5)
            ]
        );
    }

    #[test]
    fn test_priority_follows_the_viewer() {
        let mut queue = ApplyQueue::default();
        queue.push(built(ChunkCoord::new(-2, 0, 0)));
        queue.push(built(ChunkCoord::new(2, 0, 0)));

        let first = queue.pop_nearest(ChunkCoord::new(2, 0, 1)).unwrap();
        assert_eq!(first.coord, ChunkCoord::new(2, 0, 0));
    }
}
