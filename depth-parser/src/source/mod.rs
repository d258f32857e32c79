use depth_core::depth::grid::{DepthGrid, GridError};
use thiserror::Error;

pub mod exr;

#[derive(Debug, Error)]
pub enum DepthSourceError {
    #[error("the image does not contain a Z buffer")]
    MissingZChannel,
    #[error("failed to decode depth image: {0}")]
    Decode(#[from] ::exr::error::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}

pub trait SourceProvider {
    fn get_source(&self) -> Box<dyn DepthSource>;
}

pub trait DepthSource {
    fn read(&self) -> Result<DepthGrid, DepthSourceError>;
}
