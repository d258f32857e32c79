use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("depth grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("depth grid is {width}x{height} but {samples} samples were supplied")]
    SampleCountMismatch {
        width: usize,
        height: usize,
        samples: usize,
    },
}

/// Row-major raster of depth samples, read-only after construction.
#[derive(Debug, Clone)]
pub struct DepthGrid {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl DepthGrid {
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if samples.len() != width * height {
            return Err(GridError::SampleCountMismatch {
                width,
                height,
                samples: samples.len(),
            });
        }

        Ok(DepthGrid {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.samples[y * self.width + x]
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// True when every sample is bit-identical to the first. A flat grid is
    /// almost always a decode failure rather than a real scene.
    pub fn is_flat(&self) -> bool {
        let first = self.samples[0].to_bits();
        self.samples.iter().all(|s| s.to_bits() == first)
    }
}
