mod common;

use common::{assert_meshes_current, engine, fresh_mesh, installed_mesh, DRAIN_TIMEOUT};
use voxel_world::engine_state::voxels::block::block_type::BlockTypeId;
use voxel_world::engine_state::voxels::coords::{ChunkCoord, VoxelCoord};

const EMPTY: BlockTypeId = BlockTypeId(0);
const DIRT: BlockTypeId = BlockTypeId(2);
const STONE: BlockTypeId = BlockTypeId(3);

#[test]
fn test_mutation_on_chunk_edge_updates_both_chunks() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let origin = spawn.origin(4);
    let voxel = VoxelCoord::new(origin.x, origin.y, origin.z + 1);
    let current = engine.get_block(voxel).unwrap().block_type;
    let replacement = if current == STONE { DIRT } else { STONE };

    let west = ChunkCoord::new(spawn.x - 1, spawn.y, spawn.z);
    let west_installs = {
        let handle = engine.get_chunk(west).unwrap().scene().unwrap();
        engine.scene().object(handle).unwrap().installs
    };

    assert!(engine.set_block_type(voxel, replacement).unwrap());

    assert_eq!(engine.get_block(voxel).unwrap().block_type, replacement);
    assert_eq!(installed_mesh(&engine, spawn), fresh_mesh(&engine, spawn));
    assert_eq!(installed_mesh(&engine, west), fresh_mesh(&engine, west));
    let handle = engine.get_chunk(west).unwrap().scene().unwrap();
    assert!(engine.scene().object(handle).unwrap().installs > west_installs);

    assert!(engine.drain(DRAIN_TIMEOUT));
    assert_meshes_current(&engine);
}

#[test]
fn test_setting_the_same_type_is_a_no_op() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let voxel = spawn.origin(4);
    let current = engine.get_block(voxel).unwrap().block_type;
    let mesh = installed_mesh(&engine, spawn);

    assert!(!engine.set_block_type(voxel, current).unwrap());
    assert_eq!(installed_mesh(&engine, spawn), mesh);
}

#[test]
fn test_digging_lowers_ground_level() {
    let mut engine = engine();
    engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let ground = engine.ground_level(0, 0);
    let top = VoxelCoord::new(0, ground, 0);
    assert!(engine.set_block_type(top, EMPTY).unwrap());

    assert!(engine.ground_level(0, 0) < ground);
    assert_meshes_current(&engine);
}

#[test]
fn test_mutating_an_unloaded_chunk_skips_meshing() {
    let mut engine = engine();
    let coord = ChunkCoord::new(20, 0, 0);
    engine.generate_chunk_immediate(coord).unwrap();
    let mesh = installed_mesh(&engine, coord);

    let voxel = coord.origin(4);
    let current = engine.get_block(voxel).unwrap().block_type;
    let replacement = if current == STONE { EMPTY } else { STONE };
    assert!(engine.set_block_type(voxel, replacement).unwrap());

    assert_eq!(installed_mesh(&engine, coord), mesh);
    assert!(engine.is_idle());
}
