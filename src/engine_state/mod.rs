//! # Engine State Module
//!
//! The engine facade: it owns the world, the pipeline, the streaming controller
//! and the scene collaborator, and runs the apply step.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `rendering` - Mesh building and the scene interface
//! * `streaming` - Which chunks to load around the viewer
//! * `task_management` - Pipeline workers and the apply queue
//! * `voxels` - Coordinates, blocks, chunks, terrain and the world
//!
//! ## Threading
//!
//! `EngineState` lives on one thread, the only one that touches the scene.
//! The generation worker only reads the terrain generator; the build worker
//! only takes read guards on the world. Every world mutation, scene call and
//! load/unload happens inside `EngineState` methods.
//!
//! ## Tick
//!
//! Each [`EngineState::tick`]:
//! 1. Handles viewer events sent through [`EngineState::viewer_events`]
//! 2. Inserts newly generated chunks into the world and queues their first build
//! 3. Moves finished builds into the apply queue
//! 4. Applies up to `applies_per_tick` builds, nearest to the viewer first
//!
//! ## Boundaries
//!
//! A face on a chunk edge is drawn until the chunk across it is loaded. Loading
//! or unloading a chunk queues rebuilds of its loaded neighbors, and every
//! applied build compares the neighbors that were loaded when it was built
//! with the ones loaded now, queuing another rebuild if they differ. After the
//! pipeline drains, every loaded chunk's mesh matches its loaded neighbors.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use cgmath::Vector3;
use log::{debug, info, warn};
use parking_lot::{MappedRwLockReadGuard, RwLockReadGuard};
use web_time::{Duration, Instant};

use crate::config::WorldConfig;
use crate::core::MtResource;
use crate::error::WorldError;
use rendering::meshing::{MeshBuilder, MeshStamps, StampedMesh};
use rendering::scene::ChunkScene;
use streaming::StreamingController;
use task_management::{BuildCallback, BuildKind, BuiltChunk, ChunkPipeline, PipelineStats};
use voxels::block::block_side::BlockSide;
use voxels::block::block_type::BlockTypeId;
use voxels::block::registry::BlockRegistry;
use voxels::block::Block;
use voxels::chunk::Chunk;
use voxels::coords::{ChunkCoord, VoxelCoord};
use voxels::terrain::TerrainGenerator;
use voxels::world::World;

pub mod rendering;
pub mod streaming;
pub mod task_management;
pub mod voxels;

/// Notification from the component that moves the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// The viewer entered a new chunk.
    ChunkChanged(ChunkCoord),
    /// The viewer moved to a world-space position.
    Moved(Vector3<f32>),
}

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_world::config::WorldConfig;
/// use voxel_world::engine_state::EngineState;
/// use voxel_world::engine_state::rendering::MemoryScene;
/// use web_time::Duration;
///
/// let config = WorldConfig { chunk_size: 4, render_distance: 1, ..WorldConfig::default() };
/// let mut engine = EngineState::new(config, MemoryScene::new()).unwrap();
///
/// let spawn = engine.generate_world().unwrap();
/// assert!(engine.drain(Duration::from_secs(30)));
/// assert_eq!(engine.loaded_chunks().len(), 27);
/// assert!(engine.is_chunk_loaded(spawn));
/// ```
pub struct EngineState<S: ChunkScene> {
    config: Arc<WorldConfig>,
    registry: Arc<BlockRegistry>,
    /// The voxel world containing all chunk data
    world: MtResource<World>,
    generator: Arc<TerrainGenerator>,
    mesh_builder: MeshBuilder,
    stamps: MeshStamps,
    pipeline: ChunkPipeline,
    streaming: StreamingController,
    scene: S,
    /// Stamp of the mesh currently installed on each chunk's scene object.
    installed: HashMap<ChunkCoord, u64>,
    viewer_sender: Sender<ViewerEvent>,
    viewer_receiver: Receiver<ViewerEvent>,
}

impl<S: ChunkScene> EngineState<S> {
    /// Creates a new engine with an empty world and running workers.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration; validated here
    /// * `scene` - Receiver of chunk geometry
    ///
    /// # Returns
    ///
    /// The engine, or an error if the config is invalid or a worker could not start.
    pub fn new(config: WorldConfig, scene: S) -> Result<Self, WorldError> {
        config.validate()?;
        let registry = Arc::new(BlockRegistry::from_types(config.block_types.clone())?);
        let config = Arc::new(config);
        let generator = Arc::new(TerrainGenerator::new(config.clone(), &registry)?);
        let world = MtResource::new(World::new(config.clone(), registry.clone()));
        let mesh_builder = MeshBuilder::from_config(&config);
        let stamps = MeshStamps::default();
        let pipeline = ChunkPipeline::new(
            world.clone(),
            generator.clone(),
            mesh_builder,
            stamps.clone(),
        )?;
        let (viewer_sender, viewer_receiver) = channel();

        info!(
            "Engine ready: chunk size {}, render distance {}, seed {}",
            config.chunk_size, config.render_distance, config.seed
        );

        Ok(Self {
            streaming: StreamingController::new(config.render_distance),
            config,
            registry,
            world,
            generator,
            mesh_builder,
            stamps,
            pipeline,
            scene,
            installed: HashMap::new(),
            viewer_sender,
            viewer_receiver,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Shared handle to the world.
    pub fn world(&self) -> &MtResource<World> {
        &self.world
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The viewer's current chunk, once one has been reported.
    pub fn viewer_chunk(&self) -> Option<ChunkCoord> {
        self.streaming.viewer()
    }

    pub fn loaded_chunks(&self) -> &std::collections::HashSet<ChunkCoord> {
        self.streaming.loaded()
    }

    pub fn is_chunk_loaded(&self, coord: ChunkCoord) -> bool {
        self.world.get().is_chunk_loaded(coord)
    }

    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// True when the pipeline has nothing in flight and nothing to apply.
    pub fn is_idle(&self) -> bool {
        self.pipeline.is_idle()
    }

    /// Sender for viewer events; they are handled at the start of the next tick.
    pub fn viewer_events(&self) -> Sender<ViewerEvent> {
        self.viewer_sender.clone()
    }

    /// Returns the block at an absolute position, or `None` if its chunk has
    /// not been generated.
    pub fn get_block(&self, voxel: VoxelCoord) -> Option<Block> {
        self.world.get().get_block(voxel).copied()
    }

    /// Returns a read guard on a generated chunk.
    ///
    /// The guard blocks the owning thread's mutations; drop it promptly.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<MappedRwLockReadGuard<'_, Chunk>> {
        RwLockReadGuard::try_map(self.world.get(), |world| world.get_chunk(coord)).ok()
    }

    /// Height of the highest solid block in the column, or -1 if none is generated.
    pub fn ground_level(&self, x: i32, z: i32) -> i32 {
        self.world.get().ground_level(x, z)
    }

    /// Clears the world, generates the spawn chunk inline and streams the
    /// chunks around it.
    ///
    /// # Returns
    ///
    /// The spawn chunk, which holds the ground of the column at voxel (0, 0).
    pub fn generate_world(&mut self) -> Result<ChunkCoord, WorldError> {
        self.clear_world();

        let ground = self.generator.column_height(0, 0)?;
        let spawn = VoxelCoord::new(0, ground, 0).chunk(self.config.chunk_size);
        info!("Generating world with seed {}, spawn chunk {spawn}", self.config.seed);

        self.generate_chunk_immediate(spawn)?;
        self.on_viewer_chunk_changed(spawn);
        Ok(spawn)
    }

    /// Drops every chunk, pending request and scene object.
    pub fn clear_world(&mut self) {
        self.world.get_mut().clear();
        self.streaming.clear();
        self.pipeline.clear();
        self.installed.clear();
        self.scene.clear();
        info!("World cleared");
    }

    /// Generates and meshes a chunk on the calling thread, bypassing the pipeline.
    ///
    /// The chunk is not loaded; streaming or [`EngineState::load_chunk`] does that.
    ///
    /// # Returns
    ///
    /// `false` if the chunk already existed.
    pub fn generate_chunk_immediate(&mut self, coord: ChunkCoord) -> Result<bool, WorldError> {
        if self.world.get().contains_chunk(coord) {
            return Ok(false);
        }

        let chunk = self.generator.generate_chunk(coord)?;
        if !self.insert_generated(chunk) {
            return Ok(false);
        }
        self.rebuild_now(coord);
        debug!("Generated chunk {coord} inline");
        Ok(true)
    }

    /// Changes the type of one block.
    ///
    /// If the block's chunk is loaded, it is re-meshed inline, together with
    /// every other loaded chunk holding one of the block's six neighbors.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the block's chunk is not generated or the type is unchanged,
    /// or an error for an id outside the catalog.
    pub fn set_block_type(&mut self, voxel: VoxelCoord, block_type: BlockTypeId) -> Result<bool, WorldError> {
        if self.registry.get(block_type).is_none() {
            return Err(WorldError::UnknownBlockType(block_type));
        }

        let size = self.config.chunk_size;
        let owner = voxel.chunk(size);
        let (changed, owner_loaded, neighbor_chunks) = {
            let mut world = self.world.get_mut();
            let changed = world
                .get_chunk_mut(owner)
                .is_some_and(|chunk| chunk.set_block_type(voxel, block_type));

            let mut neighbor_chunks: Vec<ChunkCoord> = BlockSide::all()
                .into_iter()
                .map(|side| voxel.neighbor(side).chunk(size))
                .filter(|coord| *coord != owner && world.is_chunk_loaded(*coord))
                .collect();
            neighbor_chunks.sort();
            neighbor_chunks.dedup();

            (changed, world.is_chunk_loaded(owner), neighbor_chunks)
        };

        if !changed {
            return Ok(false);
        }
        debug!("Block {voxel} set to type {block_type}");

        if owner_loaded {
            self.rebuild_now(owner);
            for coord in neighbor_chunks {
                self.rebuild_now(coord);
            }
        }
        Ok(true)
    }

    /// Loads a chunk, generating it through the pipeline first if needed.
    ///
    /// Chunks generated through the pipeline only load if they are within
    /// render distance when their mesh is applied.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.world.get().contains_chunk(coord) {
            self.rebuild_now(coord);
            self.activate_chunk(coord)
        } else {
            let epoch = self.world.get().epoch();
            self.pipeline.request_generation(coord, epoch)
        }
    }

    /// Unloads a chunk. Returns `false` if it was not loaded.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> bool {
        let handle = {
            let mut world = self.world.get_mut();
            let Some(chunk) = world.get_chunk_mut(coord) else {
                return false;
            };
            if !chunk.mark_unloaded() {
                return false;
            }
            chunk.scene()
        };

        if let Some(handle) = handle {
            self.scene.set_active(handle, false);
        }
        self.streaming.mark_unloaded(coord);
        debug!("Unloaded chunk {coord}");
        self.rebuild_loaded_neighbors(coord);
        true
    }

    /// Queues a rebuild of a chunk through the pipeline.
    pub fn request_rebuild(&mut self, coord: ChunkCoord, callback: Option<BuildCallback>) -> bool {
        self.pipeline.request_build(coord, BuildKind::Rebuild, callback)
    }

    /// Reacts to the viewer entering a new chunk.
    ///
    /// Every chunk within render distance that is not loaded is loaded inline
    /// if it is already generated, or queued for generation otherwise. Chunks
    /// beyond render distance are unloaded afterwards.
    pub fn on_viewer_chunk_changed(&mut self, viewer: ChunkCoord) {
        let plan = self.streaming.plan(viewer);
        debug!(
            "Viewer entered chunk {viewer}: {} to load, {} to unload",
            plan.to_load.len(),
            plan.to_unload.len()
        );

        let epoch = self.world.get().epoch();
        for coord in plan.to_load {
            let generated = self.world.get().contains_chunk(coord);
            if generated {
                self.rebuild_now(coord);
                self.activate_chunk(coord);
            } else {
                self.pipeline.request_generation(coord, epoch);
            }
        }

        for coord in plan.to_unload {
            self.unload_chunk(coord);
        }
    }

    /// Reacts to the viewer moving to a world-space position.
    ///
    /// # Returns
    ///
    /// `true` if the position lies in a different chunk than before.
    pub fn viewer_moved(&mut self, position: Vector3<f32>) -> bool {
        let chunk = VoxelCoord::from_world_position(position).chunk(self.config.chunk_size);
        if self.streaming.viewer() == Some(chunk) {
            return false;
        }
        self.on_viewer_chunk_changed(chunk);
        true
    }

    /// Runs one step of the pipeline on the owning thread.
    ///
    /// # Returns
    ///
    /// The number of build results applied.
    pub fn tick(&mut self) -> usize {
        while let Ok(event) = self.viewer_receiver.try_recv() {
            match event {
                ViewerEvent::ChunkChanged(coord) => {
                    if self.streaming.viewer() != Some(coord) {
                        self.on_viewer_chunk_changed(coord);
                    }
                }
                ViewerEvent::Moved(position) => {
                    self.viewer_moved(position);
                }
            }
        }

        self.insert_generated_chunks();
        self.pipeline.collect_built();

        let viewer = self.streaming.viewer().unwrap_or_default();
        let mut applied = 0;
        while applied < self.config.applies_per_tick {
            let Some(built) = self.pipeline.pop_nearest(viewer) else {
                break;
            };
            if self.apply(built) {
                applied += 1;
            }
        }
        applied
    }

    /// Ticks until the pipeline is idle or `timeout` passes.
    ///
    /// # Returns
    ///
    /// `true` if the pipeline went idle.
    pub fn drain(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let applied = self.tick();
            if self.is_idle() {
                return true;
            }
            if Instant::now() >= deadline {
                warn!("Pipeline still busy after {timeout:?}: {:?}", self.stats());
                return false;
            }
            if applied == 0 {
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    fn insert_generated_chunks(&mut self) {
        let epoch = self.world.get().epoch();
        for generated in self.pipeline.collect_generated() {
            let coord = generated.coord;
            if generated.epoch != epoch {
                warn!("Discarding chunk {coord} generated for epoch {}", generated.epoch);
                continue;
            }
            if !self.insert_generated(generated.chunk) {
                debug!("Chunk {coord} was generated twice; keeping the first");
                continue;
            }
            self.pipeline.request_build(coord, BuildKind::Load, None);
        }
    }

    /// Installs one build result. Returns `false` if it was discarded.
    fn apply(&mut self, built: BuiltChunk) -> bool {
        let BuiltChunk {
            coord,
            kind,
            mesh,
            callback,
        } = built;

        let Some(stamped) = mesh else {
            debug!("Chunk {coord} was gone when its build ran");
            return false;
        };
        if stamped.epoch != self.world.get().epoch() {
            warn!("Discarding {kind:?} build of chunk {coord} from epoch {}", stamped.epoch);
            return false;
        }

        let built_against = stamped.loaded_neighbors;
        match kind {
            BuildKind::Load => {
                self.install(stamped);
                if self.streaming.is_in_range(coord) {
                    self.activate_chunk(coord);
                } else {
                    debug!("Chunk {coord} left render distance before it was applied");
                }
            }
            BuildKind::Rebuild => {
                if self.world.get().is_chunk_loaded(coord) {
                    self.install(stamped);
                }
            }
        }

        let stale_boundary = {
            let world = self.world.get();
            world.is_chunk_loaded(coord) && world.loaded_neighbors(coord) != built_against
        };
        if stale_boundary {
            debug!("Neighbors of chunk {coord} changed while it was built");
            self.pipeline.request_build(coord, BuildKind::Rebuild, None);
        }

        if let Some(callback) = callback {
            callback(coord);
        }
        true
    }

    /// Inserts a generated chunk and attaches its scene object.
    fn insert_generated(&mut self, mut chunk: Chunk) -> bool {
        let coord = chunk.coord();
        if self.world.get().contains_chunk(coord) {
            return false;
        }
        chunk.attach_scene(self.scene.attach(coord));
        self.world.get_mut().insert_chunk(chunk)
    }

    /// Builds a chunk's mesh inline and installs it.
    fn rebuild_now(&mut self, coord: ChunkCoord) -> bool {
        let stamped = {
            let world = self.world.get();
            self.mesh_builder.build_stamped(&world, coord, &self.stamps)
        };
        stamped.is_some_and(|stamped| self.install(stamped))
    }

    /// Installs a mesh unless a newer one is already installed.
    fn install(&mut self, stamped: StampedMesh) -> bool {
        let coord = stamped.coord;
        if self.installed.get(&coord).is_some_and(|&current| current >= stamped.stamp) {
            debug!("Skipping outdated mesh {} of chunk {coord}", stamped.stamp);
            return false;
        }

        let Some(handle) = self.world.get().get_chunk(coord).and_then(Chunk::scene) else {
            return false;
        };
        self.scene.install(handle, &stamped.mesh);
        self.installed.insert(coord, stamped.stamp);
        true
    }

    /// Marks a generated chunk loaded and shows it. Returns `false` if it
    /// already was loaded or does not exist.
    fn activate_chunk(&mut self, coord: ChunkCoord) -> bool {
        let handle = {
            let mut world = self.world.get_mut();
            let Some(chunk) = world.get_chunk_mut(coord) else {
                return false;
            };
            if !chunk.mark_loaded() {
                return false;
            }
            chunk.scene()
        };

        if let Some(handle) = handle {
            self.scene.set_active(handle, true);
        }
        self.streaming.mark_loaded(coord);
        debug!("Loaded chunk {coord}");
        self.rebuild_loaded_neighbors(coord);
        true
    }

    fn rebuild_loaded_neighbors(&mut self, coord: ChunkCoord) {
        let neighbors: Vec<ChunkCoord> = {
            let world = self.world.get();
            coord
                .neighbors()
                .into_iter()
                .filter(|neighbor| world.is_chunk_loaded(*neighbor))
                .collect()
        };
        for neighbor in neighbors {
            self.pipeline.request_build(neighbor, BuildKind::Rebuild, None);
        }
    }
}
