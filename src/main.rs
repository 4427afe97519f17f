//! # Voxel World Demo
//!
//! Generates a world, streams chunks around the spawn point, then walks the
//! viewer along +X and logs what the pipeline and scene did.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::process::ExitCode;

use cgmath::Vector3;
use log::{error, info};
use voxel_world::engine_state::rendering::MemoryScene;
use voxel_world::{EngineState, WorldConfig, WorldError};
use web_time::{Duration, Instant};

const WALK_STEPS: i32 = 3;
const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> ExitCode {
    voxel_world::init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), WorldError> {
    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    let chunk_size = config.chunk_size;

    let mut engine = EngineState::new(config, MemoryScene::new())?;

    let start = Instant::now();
    let spawn = engine.generate_world()?;
    engine.drain(DRAIN_TIMEOUT);
    info!(
        "Spawned in chunk {spawn}: {} chunks loaded in {:?}",
        engine.loaded_chunks().len(),
        start.elapsed()
    );
    info!("Ground level at the origin: {}", engine.ground_level(0, 0));

    let viewer_y = (spawn.y * chunk_size) as f32 + 0.5;
    for step in 1..=WALK_STEPS {
        let position = Vector3::new((step * chunk_size) as f32 + 0.5, viewer_y, 0.5);
        engine.viewer_moved(position);

        let start = Instant::now();
        engine.drain(DRAIN_TIMEOUT);
        info!(
            "Step {step}: viewer in chunk {:?}, {} chunks loaded in {:?}",
            engine.viewer_chunk(),
            engine.loaded_chunks().len(),
            start.elapsed()
        );
    }

    let (render_faces, collision_faces) = engine.scene().active_face_counts();
    info!(
        "Scene: {} objects, {} active, {render_faces} render faces, {collision_faces} collision faces",
        engine.scene().len(),
        engine.scene().active_count()
    );
    info!("Pipeline: {:?}", engine.stats());
    Ok(())
}
