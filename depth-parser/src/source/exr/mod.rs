use std::path::PathBuf;

use exr::prelude::*;

use depth_core::depth::grid::DepthGrid;

use super::{DepthSource, DepthSourceError, SourceProvider};

pub struct ExrSourceProvider {
    pub filename: PathBuf,
}

impl SourceProvider for ExrSourceProvider {
    fn get_source(&self) -> Box<dyn DepthSource> {
        Box::new(ExrDepthSource {
            filename: self.filename.clone(),
        })
    }
}

pub struct ExrDepthSource {
    pub filename: PathBuf,
}

impl DepthSource for ExrDepthSource {
    /// Loads the `Z` channel of the first layer that carries one. Samples
    /// cover the layer's own data window, so a non-zero window origin needs
    /// no special handling. f16 and u32 channels are widened to f32.
    fn read(&self) -> std::result::Result<DepthGrid, DepthSourceError> {
        let image = read_all_flat_layers_from_file(&self.filename)?;

        let z_name = Text::from("Z");
        for layer in &image.layer_data {
            let width = layer.size.0;
            let height = layer.size.1;

            for channel in &layer.channel_data.list {
                if channel.name == z_name {
                    let samples: Vec<f32> = channel.sample_data.values_as_f32().collect();
                    return Ok(DepthGrid::new(width, height, samples)?);
                }
            }
        }

        Err(DepthSourceError::MissingZChannel)
    }
}
