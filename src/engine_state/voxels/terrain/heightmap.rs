//! # Heightmap Generation
//!
//! Layered (fractal) Perlin noise normalized into `[0, 1]`.
//!
//! ## Algorithm
//!
//! 1. Seed a deterministic PRNG and draw one random 2D offset per octave; the
//!    caller's offset is added to each of them.
//! 2. For every cell, sum `octaves` layers of Perlin noise sampled at
//!    `(cell + half_extent + octave_offset) / scale * frequency`. Each sample is
//!    mapped into `[-1, 1]` and weighted by the layer's amplitude. Amplitude is
//!    multiplied by `persistence` and frequency by `lacunarity` after each layer.
//! 3. Remap every sum from the analytic bounds `±Σ persistence^i` into `[0, 1]`.
//!
//! Passing the chunk's absolute voxel origin as the offset makes neighboring
//! chunks' heightmaps continuous across their shared edge.

use cgmath::Vector2;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// Scales at or below zero are replaced by this value.
pub const MIN_SCALE: f32 = 0.00001;

/// Range of the per-octave random offsets.
const OCTAVE_OFFSET_RANGE: std::ops::Range<i32> = -100_000..100_000;

/// Noise layering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Number of noise layers. Must be positive.
    pub octaves: i32,
    /// Zoom of the noise; larger is smoother.
    pub scale: f32,
    /// Amplitude factor between octaves.
    pub persistence: f32,
    /// Frequency factor between octaves.
    pub lacunarity: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            octaves: 4,
            scale: 20.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// A `width × height` grid of normalized heights.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl Heightmap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Generates a heightmap from a settings bundle.
///
/// See [`generate_heightmap`].
pub fn heightmap(
    width: usize,
    height: usize,
    seed: u64,
    settings: &NoiseSettings,
    offset: Vector2<f32>,
) -> Result<Heightmap, GeneratorError> {
    generate_heightmap(
        width,
        height,
        seed,
        settings.octaves,
        settings.scale,
        settings.persistence,
        settings.lacunarity,
        offset,
    )
}

/// Generates a heightmap of layered Perlin noise.
///
/// # Arguments
/// * `width`, `height` - Size of the output grid
/// * `seed` - Seed of the PRNG drawing the per-octave offsets
/// * `octaves` - Number of noise layers; must be positive
/// * `scale` - Zoom of the noise; values `<= 0` are clamped to [`MIN_SCALE`]
/// * `persistence` - Amplitude factor between octaves
/// * `lacunarity` - Frequency factor between octaves
/// * `offset` - Added to every octave offset; pass the chunk origin's `(x, z)`
///
/// # Returns
/// A heightmap with every value in `[0, 1]`, bit-identical for identical
/// arguments, or [`GeneratorError::NonPositiveOctaves`].
#[allow(clippy::too_many_arguments)]
pub fn generate_heightmap(
    width: usize,
    height: usize,
    seed: u64,
    octaves: i32,
    scale: f32,
    persistence: f32,
    lacunarity: f32,
    offset: Vector2<f32>,
) -> Result<Heightmap, GeneratorError> {
    if octaves <= 0 {
        return Err(GeneratorError::NonPositiveOctaves { octaves });
    }

    let scale = if scale <= 0.0 { MIN_SCALE } else { scale } as f64;
    let persistence = persistence as f64;
    let lacunarity = lacunarity as f64;

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut octave_offsets = Vec::with_capacity(octaves as usize);
    let mut max_sum = 0.0f64;
    for i in 0..octaves {
        let offset_x = rng.i32(OCTAVE_OFFSET_RANGE) as f64 + offset.x as f64;
        let offset_y = rng.i32(OCTAVE_OFFSET_RANGE) as f64 + offset.y as f64;
        octave_offsets.push((offset_x, offset_y));
        max_sum += persistence.powi(i);
    }
    let min_sum = -max_sum;

    let perlin = Perlin::new(0);
    let half_width = width as f64 / 2.0;
    let half_height = height as f64 / 2.0;

    let mut values = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut sum = 0.0;

            for &(offset_x, offset_y) in &octave_offsets {
                let sample_x = (x as f64 + half_width + offset_x) / scale * frequency;
                let sample_y = (y as f64 + half_height + offset_y) / scale * frequency;

                // Perlin output is [-1, 1]; fold it through [0, 1] first.
                let unit = ((perlin.get([sample_x, sample_y]) + 1.0) * 0.5).clamp(0.0, 1.0);
                sum += (unit * 2.0 - 1.0) * amplitude;

                amplitude *= persistence;
                frequency *= lacunarity;
            }

            let normalized = if max_sum > min_sum {
                (sum - min_sum) / (max_sum - min_sum)
            } else {
                0.5
            };
            values.push(normalized.clamp(0.0, 1.0) as f32);
        }
    }

    Ok(Heightmap {
        width,
        height,
        values,
    })
}
