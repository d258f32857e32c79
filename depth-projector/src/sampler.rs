use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use depth_core::depth::grid::DepthGrid;
use depth_core::depth::point::PcdPoint;

use crate::camera::CameraModel;
use crate::projector::PinholeProjector;

/// Which candidate pixels become points, and how they are perturbed.
#[derive(Debug, Clone, Copy)]
pub struct SamplingPolicy {
    /// Depths at or below this bound are dropped.
    pub lower_cut: f32,
    /// Depths at or above this bound are dropped.
    pub upper_cut: f32,
    /// Independent per-pixel retention probability, in [0, 1].
    pub keep_fraction: f32,
    /// Standard deviation of the gaussian noise added to each coordinate.
    pub noise_stddev: f32,
    /// Packed color scalar attached to every emitted point.
    pub point_color: f32,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy {
            lower_cut: f32::NEG_INFINITY,
            upper_cut: f32::INFINITY,
            keep_fraction: 1.0,
            noise_stddev: 0.0,
            point_color: 4.2108e+06,
        }
    }
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("depth grid is flat (every sample equals {0}), refusing to emit a degenerate cloud")]
    FlatDepthGrid(f32),
    #[error("invalid noise standard deviation: {0}")]
    InvalidNoise(f32),
}

/// Runs the sampling pass with a fresh entropy seed.
pub fn sample_cloud(
    grid: &DepthGrid,
    camera: &CameraModel,
    policy: &SamplingPolicy,
) -> Result<Vec<PcdPoint>, SampleError> {
    let seed = rand::thread_rng().next_u64();
    sample_cloud_seeded(grid, camera, policy, seed)
}

/// One pass over the grid in raster order (y ascending, then x): range
/// filter, probabilistic keep, unprojection, optional noise. The seed fixes
/// the random stream, so identical inputs reproduce identical clouds.
pub fn sample_cloud_seeded(
    grid: &DepthGrid,
    camera: &CameraModel,
    policy: &SamplingPolicy,
    seed: u64,
) -> Result<Vec<PcdPoint>, SampleError> {
    if grid.is_flat() {
        return Err(SampleError::FlatDepthGrid(grid.get(0, 0)));
    }

    // With zero stddev no draws happen at all, keeping the output
    // bit-deterministic.
    let noise = if policy.noise_stddev > 0.0 {
        Some(
            Normal::new(0.0f32, policy.noise_stddev)
                .map_err(|_| SampleError::InvalidNoise(policy.noise_stddev))?,
        )
    } else {
        None
    };

    let projector = PinholeProjector::new(camera, grid.width(), grid.height());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let depth = grid.get(x, y);

            // Strict on both sides: a depth exactly at a cut is dropped.
            if !(depth > policy.lower_cut && depth < policy.upper_cut) {
                continue;
            }
            // The draw is in [0, 1), so 1.0 keeps everything and 0.0 nothing.
            if !(rng.gen::<f32>() < policy.keep_fraction) {
                continue;
            }

            let [px, py, pz] = projector.unproject(x, y, depth);
            let (nx, ny, nz) = match &noise {
                Some(d) => (d.sample(&mut rng), d.sample(&mut rng), d.sample(&mut rng)),
                None => (0.0, 0.0, 0.0),
            };

            points.push(PcdPoint {
                x: px + nx,
                y: py + ny,
                z: pz + nz,
                rgb: policy.point_color,
            });
        }
    }

    Ok(points)
}
