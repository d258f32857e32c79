pub mod camera;
pub mod projector;
pub mod sampler;

pub use camera::{CameraModel, RayMode};
pub use projector::PinholeProjector;
pub use sampler::{sample_cloud, sample_cloud_seeded, SampleError, SamplingPolicy};
