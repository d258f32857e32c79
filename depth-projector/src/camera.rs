/// How a pixel ray is normalized before being scaled by the depth sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayMode {
    /// Unit-length rays: the depth value is the euclidean distance from the
    /// focal point to the scene point.
    #[default]
    UnitLength,
    /// Rays scaled so their z component equals the focal length: the depth
    /// value is the distance along the optical axis. Matches renderers that
    /// export planar Z buffers.
    FocalLength,
}

/// Pinhole camera parameters. Both lengths are in millimeters and must be
/// strictly positive; the sensor height is derived from the raster aspect
/// ratio when a projector is built.
#[derive(Debug, Clone, Copy)]
pub struct CameraModel {
    pub sensor_width: f32,
    pub focal_length: f32,
    pub ray_mode: RayMode,
}

impl Default for CameraModel {
    fn default() -> Self {
        CameraModel {
            sensor_width: 36.0,
            focal_length: 50.0,
            ray_mode: RayMode::default(),
        }
    }
}
