use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use depth_parser::source::exr::ExrSourceProvider;
use depth_parser::source::{DepthSourceError, SourceProvider as _};
use depth_projector::camera::{CameraModel, RayMode};
use depth_projector::sampler::{sample_cloud, SampleError, SamplingPolicy};
use pcd_exporter::pcd::write_pcd;

#[derive(Parser, Debug)]
#[command(
    name = "depth2pcd",
    about = "OpenEXR with Z Buffer to PCD point cloud converter",
    version = "0.0.1"
)]
struct Cli {
    /// Source depth image (OpenEXR with a Z channel)
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Destination file (defaults to the input path with a .pcd extension)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pinhole sensor width in mm
    #[arg(long, value_name = "FLOAT")]
    sensor_width: Option<String>,

    /// Pinhole focal length in mm
    #[arg(long, value_name = "FLOAT")]
    focal_length: Option<String>,

    /// Cuts off points this far away or farther
    #[arg(long, value_name = "FLOAT")]
    upper_cut: Option<String>,

    /// Cuts off points this close or closer
    #[arg(long, value_name = "FLOAT")]
    lower_cut: Option<String>,

    /// Fraction of points to keep, in [0,1]
    #[arg(long, value_name = "FLOAT")]
    keep_fraction: Option<String>,

    /// Standard deviation of gaussian noise added to every coordinate
    #[arg(long, value_name = "FLOAT")]
    add_noise: Option<String>,

    /// Packed color value written for every point
    #[arg(long, value_name = "FLOAT")]
    rgb: Option<String>,

    /// Treat depth as distance along the optical axis instead of along the
    /// viewing ray (no spherical correction)
    #[arg(long)]
    planar_depth: bool,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("no input file given")]
    MissingInput,
    #[error(transparent)]
    Source(#[from] DepthSourceError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lenient float parsing for the numeric flags: a malformed value is
/// reported on the error stream and replaced by the documented default,
/// never aborting the run.
fn parse_float_arg(name: &str, raw: Option<&str>, default: f32) -> f32 {
    match raw {
        None => default,
        Some(text) => match text.parse::<f32>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!(
                    "invalid value '{}' for {}, falling back to {}",
                    text,
                    name,
                    default
                );
                default
            }
        },
    }
}

fn positive_or_default(name: &str, value: f32, default: f32) -> f32 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        log::warn!(
            "{} must be strictly positive, got {}, falling back to {}",
            name,
            value,
            default
        );
        default
    }
}

fn clamped_fraction(name: &str, value: f32) -> f32 {
    if (0.0..=1.0).contains(&value) {
        value
    } else {
        let clamped = if value.is_nan() {
            1.0
        } else {
            value.clamp(0.0, 1.0)
        };
        log::warn!(
            "{} must be in [0,1], got {}, falling back to {}",
            name,
            value,
            clamped
        );
        clamped
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pcd")
}

fn run(args: Cli) -> Result<(), AppError> {
    let input = args.input.ok_or(AppError::MissingInput)?;
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&input));

    let sensor_width = positive_or_default(
        "--sensor-width",
        parse_float_arg("--sensor-width", args.sensor_width.as_deref(), 36.0),
        36.0,
    );
    let focal_length = positive_or_default(
        "--focal-length",
        parse_float_arg("--focal-length", args.focal_length.as_deref(), 50.0),
        50.0,
    );

    let camera = CameraModel {
        sensor_width,
        focal_length,
        ray_mode: if args.planar_depth {
            RayMode::FocalLength
        } else {
            RayMode::UnitLength
        },
    };

    let keep_fraction = clamped_fraction(
        "--keep-fraction",
        parse_float_arg("--keep-fraction", args.keep_fraction.as_deref(), 1.0),
    );
    let noise_stddev = parse_float_arg("--add-noise", args.add_noise.as_deref(), 0.0);
    let noise_stddev = if noise_stddev >= 0.0 {
        noise_stddev
    } else {
        log::warn!(
            "--add-noise must be non-negative, got {}, falling back to 0",
            noise_stddev
        );
        0.0
    };

    let policy = SamplingPolicy {
        lower_cut: parse_float_arg("--lower-cut", args.lower_cut.as_deref(), f32::NEG_INFINITY),
        upper_cut: parse_float_arg("--upper-cut", args.upper_cut.as_deref(), f32::INFINITY),
        keep_fraction,
        noise_stddev,
        point_color: parse_float_arg("--rgb", args.rgb.as_deref(), 4.2108e+06),
    };

    log::info!("input file: {}", input.display());
    log::info!("output file: {}", output.display());
    log::info!(
        "camera: sensor width {}mm, focal length {}mm, {:?} rays",
        camera.sensor_width,
        camera.focal_length,
        camera.ray_mode
    );
    log::info!(
        "sampling: cuts ({}, {}), keep fraction {}, noise stddev {}",
        policy.lower_cut,
        policy.upper_cut,
        policy.keep_fraction,
        policy.noise_stddev
    );

    let start = std::time::Instant::now();

    let provider = ExrSourceProvider {
        filename: input.clone(),
    };
    let grid = provider.get_source().read()?;
    log::info!("depth grid: {}x{}", grid.width(), grid.height());

    let points = sample_cloud(&grid, &camera, &policy)?;
    log::info!(
        "emitted {} of {} pixels in {:?}",
        points.len(),
        grid.width() * grid.height(),
        start.elapsed()
    );

    let file = File::create(&output).map_err(|e| AppError::Output {
        path: output.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write_pcd(&mut writer, &points).map_err(|e| AppError::Output {
        path: output.clone(),
        source: e,
    })?;

    log::info!("wrote {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let args = Cli::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_float_arg_uses_value_when_valid() {
        assert_eq!(parse_float_arg("--keep-fraction", Some("0.5"), 1.0), 0.5);
        assert_eq!(
            parse_float_arg("--lower-cut", Some("-inf"), 0.0),
            f32::NEG_INFINITY
        );
    }

    #[test]
    fn parse_float_arg_falls_back_on_garbage() {
        assert_eq!(parse_float_arg("--keep-fraction", Some("abc"), 1.0), 1.0);
        assert_eq!(parse_float_arg("--rgb", Some(""), 4.2108e+06), 4.2108e+06);
    }

    #[test]
    fn parse_float_arg_defaults_when_absent() {
        assert_eq!(parse_float_arg("--sensor-width", None, 36.0), 36.0);
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(clamped_fraction("--keep-fraction", 1.5), 1.0);
        assert_eq!(clamped_fraction("--keep-fraction", -0.1), 0.0);
        assert_eq!(clamped_fraction("--keep-fraction", 0.3), 0.3);
    }

    #[test]
    fn camera_parameters_must_be_positive() {
        assert_eq!(positive_or_default("--focal-length", -5.0, 50.0), 50.0);
        assert_eq!(positive_or_default("--focal-length", 0.0, 50.0), 50.0);
        assert_eq!(positive_or_default("--focal-length", 42.0, 50.0), 42.0);
    }

    #[test]
    fn missing_input_is_a_usage_error() {
        let args = Cli::parse_from(["depth2pcd"]);
        let result = run(args);
        assert!(matches!(result, Err(AppError::MissingInput)));
    }

    #[test]
    fn output_defaults_next_to_the_input() {
        let input = PathBuf::from("/tmp/scene.exr");
        assert_eq!(default_output_path(&input), PathBuf::from("/tmp/scene.pcd"));
    }
}
