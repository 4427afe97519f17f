#![allow(dead_code)]

use std::collections::HashSet;

use voxel_world::engine_state::rendering::{ChunkMesh, MemoryScene, MeshBuilder};
use voxel_world::engine_state::voxels::coords::ChunkCoord;
use voxel_world::{EngineState, WorldConfig};
use web_time::Duration;

pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

pub fn small_config() -> WorldConfig {
    WorldConfig {
        chunk_size: 4,
        render_distance: 1,
        ..WorldConfig::default()
    }
}

pub fn engine() -> EngineState<MemoryScene> {
    let _ = env_logger::builder().is_test(true).try_init();
    EngineState::new(small_config(), MemoryScene::new()).unwrap()
}

/// Mesh currently installed on the scene object of `coord`.
pub fn installed_mesh(engine: &EngineState<MemoryScene>, coord: ChunkCoord) -> ChunkMesh {
    let handle = engine
        .get_chunk(coord)
        .and_then(|chunk| chunk.scene())
        .expect("chunk has a scene object");
    engine.scene().object(handle).expect("scene object exists").mesh.clone()
}

/// Mesh a build would produce from the world as it is now.
pub fn fresh_mesh(engine: &EngineState<MemoryScene>, coord: ChunkCoord) -> ChunkMesh {
    let builder = MeshBuilder::from_config(engine.config());
    let world = engine.world().get();
    builder.build(&world, coord).expect("chunk is generated")
}

pub fn cube(center: ChunkCoord, radius: i32) -> HashSet<ChunkCoord> {
    center.cube(radius).collect()
}

/// Asserts that every loaded chunk shows the mesh of the current world.
pub fn assert_meshes_current(engine: &EngineState<MemoryScene>) {
    for &coord in engine.loaded_chunks() {
        assert_eq!(
            installed_mesh(engine, coord),
            fresh_mesh(engine, coord),
            "installed mesh of chunk {coord} is stale"
        );
    }
}
