mod common;

use std::sync::mpsc::channel;

use cgmath::Vector3;
use common::{assert_meshes_current, cube, engine, DRAIN_TIMEOUT};
use voxel_world::engine_state::voxels::coords::ChunkCoord;
use voxel_world::ViewerEvent;

#[test]
fn test_world_converges_around_spawn() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();

    assert!(engine.drain(DRAIN_TIMEOUT));

    assert_eq!(*engine.loaded_chunks(), cube(spawn, 1));
    assert_eq!(engine.scene().active_count(), 27);
    assert_meshes_current(&engine);
    assert_eq!(engine.stats().failed_jobs, 0);
}

#[test]
fn test_spawn_chunk_holds_the_origin_ground() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let ground = engine.ground_level(0, 0);
    assert!(ground >= 0);
    assert_eq!(ground.div_euclid(4), spawn.y);
}

#[test]
fn test_moving_viewer_loads_front_and_unloads_back() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let position = Vector3::new(4.5, (spawn.y * 4) as f32 + 0.5, 0.5);
    assert!(engine.viewer_moved(position));
    assert!(engine.drain(DRAIN_TIMEOUT));

    let viewer = ChunkCoord::new(spawn.x + 1, spawn.y, spawn.z);
    assert_eq!(engine.viewer_chunk(), Some(viewer));
    assert_eq!(*engine.loaded_chunks(), cube(viewer, 1));

    let behind = ChunkCoord::new(spawn.x - 1, spawn.y, spawn.z);
    assert!(!engine.is_chunk_loaded(behind));
    assert!(engine.get_chunk(behind).is_some());
    assert_eq!(engine.scene().active_count(), 27);
    assert_meshes_current(&engine);
}

#[test]
fn test_returning_viewer_reloads_generated_chunks() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    engine.on_viewer_chunk_changed(ChunkCoord::new(spawn.x + 2, spawn.y, spawn.z));
    assert!(engine.drain(DRAIN_TIMEOUT));
    let generated = engine.world().get().chunk_count();

    engine.on_viewer_chunk_changed(spawn);
    assert!(engine.drain(DRAIN_TIMEOUT));

    assert_eq!(engine.world().get().chunk_count(), generated);
    assert_eq!(*engine.loaded_chunks(), cube(spawn, 1));
    assert_meshes_current(&engine);
}

#[test]
fn test_viewer_events_are_handled_on_tick() {
    let mut engine = engine();
    engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let target = ChunkCoord::new(10, 0, 10);
    engine.viewer_events().send(ViewerEvent::ChunkChanged(target)).unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    assert_eq!(engine.viewer_chunk(), Some(target));
    assert_eq!(*engine.loaded_chunks(), cube(target, 1));
    assert_meshes_current(&engine);
}

#[test]
fn test_rebuild_callback_runs_on_apply() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let (sender, receiver) = channel();
    let queued = engine.request_rebuild(
        spawn,
        Some(Box::new(move |coord| {
            sender.send(coord).unwrap();
        })),
    );
    assert!(queued);
    assert!(receiver.try_recv().is_err());

    assert!(engine.drain(DRAIN_TIMEOUT));
    assert_eq!(receiver.try_recv(), Ok(spawn));
}

#[test]
fn test_clearing_mid_flight_discards_old_results() {
    let mut engine = engine();
    engine.generate_world().unwrap();
    engine.clear_world();

    assert!(engine.drain(DRAIN_TIMEOUT));

    assert_eq!(engine.world().get().chunk_count(), 0);
    assert!(engine.scene().is_empty());
    assert!(engine.loaded_chunks().is_empty());
}

#[test]
fn test_regenerating_reproduces_the_world() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));
    let before: Vec<_> = engine.get_chunk(spawn).unwrap().blocks().to_vec();

    assert_eq!(engine.generate_world().unwrap(), spawn);
    assert!(engine.drain(DRAIN_TIMEOUT));

    assert_eq!(engine.get_chunk(spawn).unwrap().blocks(), before.as_slice());
    assert_eq!(*engine.loaded_chunks(), cube(spawn, 1));
}

#[test]
fn test_moved_event_streams_around_the_new_position() {
    let mut engine = engine();
    let spawn = engine.generate_world().unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let events = engine.viewer_events();
    let y = (spawn.y * 4) as f32 + 0.5;
    // Still inside the spawn chunk: nothing changes.
    events.send(ViewerEvent::Moved(Vector3::new(3.5, y, 3.5))).unwrap();
    engine.tick();
    assert_eq!(engine.viewer_chunk(), Some(spawn));

    events.send(ViewerEvent::Moved(Vector3::new(-0.5, y, 8.5))).unwrap();
    assert!(engine.drain(DRAIN_TIMEOUT));

    let viewer = ChunkCoord::new(spawn.x - 1, spawn.y, spawn.z + 2);
    assert_eq!(engine.viewer_chunk(), Some(viewer));
    assert_eq!(*engine.loaded_chunks(), cube(viewer, 1));
    assert_meshes_current(&engine);
}
