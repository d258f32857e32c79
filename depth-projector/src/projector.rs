use crate::camera::{CameraModel, RayMode};

/// Unprojects pixels of a `width x height` raster through a pinhole camera
/// sitting at the origin and looking down the negative z axis.
///
/// The sensor spans the full raster: pixel (0, 0) maps to its top-left
/// corner. Sensor height is `sensor_width / aspect_ratio`, so square pixels
/// are assumed.
#[derive(Debug, Clone)]
pub struct PinholeProjector {
    sensor_width: f32,
    sensor_height: f32,
    focal_length: f32,
    width: f32,
    height: f32,
    ray_mode: RayMode,
}

impl PinholeProjector {
    pub fn new(camera: &CameraModel, width: usize, height: usize) -> Self {
        let aspect_ratio = width as f32 / height as f32;
        let sensor_height = camera.sensor_width / aspect_ratio;

        PinholeProjector {
            sensor_width: camera.sensor_width,
            sensor_height,
            focal_length: camera.focal_length,
            width: width as f32,
            height: height as f32,
            ray_mode: camera.ray_mode,
        }
    }

    /// Camera-space position of the depth sample at pixel (x, y).
    /// Deterministic: identical inputs yield bit-identical output.
    pub fn unproject(&self, x: usize, y: usize, depth: f32) -> [f32; 3] {
        let sensor_x = self.sensor_width * x as f32 / self.width;
        let sensor_y = self.sensor_height * y as f32 / self.height;

        let centered_x = sensor_x - self.sensor_width / 2.0;
        let centered_y = sensor_y - self.sensor_height / 2.0;

        // Ray from the focal point through the sensor plane at
        // z = -focal_length. Image y grows downward, world y grows upward.
        let direction = [centered_x, -centered_y, -self.focal_length];

        let scale = match self.ray_mode {
            RayMode::UnitLength => {
                let length = (direction[0] * direction[0]
                    + direction[1] * direction[1]
                    + direction[2] * direction[2])
                    .sqrt();
                depth / length
            }
            RayMode::FocalLength => depth / self.focal_length,
        };

        [
            direction[0] * scale,
            direction[1] * scale,
            direction[2] * scale,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn unprojection_is_deterministic() {
        let projector = PinholeProjector::new(&CameraModel::default(), 640, 480);
        let a = projector.unproject(123, 45, 6.7);
        let b = projector.unproject(123, 45, 6.7);
        assert_eq!(a, b);
    }

    #[test]
    fn center_pixel_lies_on_the_optical_axis() {
        let projector = PinholeProjector::new(&CameraModel::default(), 2, 2);
        let position = projector.unproject(1, 1, 12.0);
        assert_eq!(position[0], 0.0);
        assert_eq!(position[1], 0.0);
        assert_close(position[2], -12.0);
    }

    #[test]
    fn unit_rays_preserve_depth_as_distance() {
        let projector = PinholeProjector::new(&CameraModel::default(), 64, 48);
        let position = projector.unproject(3, 40, 25.0);
        let distance =
            (position[0].powi(2) + position[1].powi(2) + position[2].powi(2)).sqrt();
        assert_close(distance, 25.0);
    }

    #[test]
    fn planar_rays_preserve_depth_along_the_axis() {
        let camera = CameraModel {
            ray_mode: RayMode::FocalLength,
            ..CameraModel::default()
        };
        let projector = PinholeProjector::new(&camera, 64, 48);
        let position = projector.unproject(3, 40, 25.0);
        assert_close(position[2], -25.0);
    }

    #[test]
    fn ray_modes_differ_off_axis() {
        let unit = PinholeProjector::new(&CameraModel::default(), 64, 48);
        let planar = PinholeProjector::new(
            &CameraModel {
                ray_mode: RayMode::FocalLength,
                ..CameraModel::default()
            },
            64,
            48,
        );
        let a = unit.unproject(0, 0, 10.0);
        let b = planar.unproject(0, 0, 10.0);
        assert!(a[2] > b[2], "unit rays reach less far along z: {:?} {:?}", a, b);
    }

    #[test]
    fn two_by_one_scanline() {
        // 36mm sensor over a 2x1 raster: pixel 0 sits left of center,
        // pixel 1 exactly on the axis.
        let camera = CameraModel {
            ray_mode: RayMode::FocalLength,
            ..CameraModel::default()
        };
        let projector = PinholeProjector::new(&camera, 2, 1);

        let left = projector.unproject(0, 0, 10.0);
        let center = projector.unproject(1, 0, 20.0);

        assert!(left[0] < 0.0);
        assert_eq!(center[0], 0.0);
        assert_close(left[2], -10.0);
        assert_close(center[2], -20.0);
        assert_close(center[2] / left[2], 2.0);
    }
}
