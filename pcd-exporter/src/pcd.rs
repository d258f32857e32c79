use std::io::Write;

use depth_core::depth::point::PcdPoint;

/// Serializes a point cloud in the PCD v.7 ASCII variant.
/// See https://pointclouds.org/documentation/tutorials/pcd_file_format.html
///
/// The cloud is written as a single row: WIDTH and POINTS both carry the
/// point count. Coordinates use Rust's shortest round-trip f32 formatting.
pub fn write_pcd<W: Write>(writer: &mut W, points: &[PcdPoint]) -> std::io::Result<()> {
    write_header(writer, points.len())?;

    for point in points {
        writeln!(writer, "{} {} {} {}", point.x, point.y, point.z, point.rgb)?;
    }

    writer.flush()
}

fn write_header<W: Write>(writer: &mut W, point_count: usize) -> std::io::Result<()> {
    writeln!(writer, "# .PCD v.7 - Point Cloud Data file format")?;
    writeln!(writer, "VERSION .7")?;
    writeln!(writer, "FIELDS x y z rgb")?;
    writeln!(writer, "SIZE 4 4 4 4")?;
    writeln!(writer, "TYPE F F F F")?;
    writeln!(writer, "COUNT 1 1 1 1")?;
    writeln!(writer, "WIDTH {}", point_count)?;
    writeln!(writer, "HEIGHT 1")?;
    writeln!(writer, "VIEWPOINT 0 0 0 1 0 0 0")?;
    writeln!(writer, "POINTS {}", point_count)?;
    writeln!(writer, "DATA ascii")?;
    Ok(())
}
