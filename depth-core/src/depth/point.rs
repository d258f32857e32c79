/// One output record of the converter: a camera-space position plus the
/// packed color scalar written verbatim into the PCD `rgb` field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcdPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: f32,
}
