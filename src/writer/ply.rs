//! PLY framing: header plus ASCII or binary-little-endian body rows.
//!
//! The header and row layout follow schema order exactly; ASCII and binary
//! encodings of the same data carry the same properties in the same order.
//! ASCII floats use fixed 6-fractional-digit formatting (`%.6f`), never
//! locale-dependent.

use crate::export::column::Column;
use crate::util::Result;
use crate::writer::stream::OutStream;

/// Write the PLY header.
///
/// `properties` is the ordered (type, name) list, e.g. `("float", "x")`.
pub fn write_header<'a>(
    stream: &mut OutStream,
    use_ascii: bool,
    total_points: u64,
    properties: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    stream.write_str("ply\n")?;
    let format = if use_ascii { "ascii" } else { "binary_little_endian" };
    stream.write_str(&format!("format {format} 1.0\n"))?;
    stream.write_str(&format!("element vertex {total_points}\n"))?;
    for (ply_type, name) in properties {
        stream.write_str(&format!("property {ply_type} {name}\n"))?;
    }
    stream.write_str("end_header\n")?;
    Ok(())
}

/// Write one object's rows as ASCII: one line per point, space-separated
/// values in column order.
pub fn write_rows_ascii(stream: &mut OutStream, columns: &[Column], count: usize) -> Result<()> {
    let mut line = String::new();
    for row in 0..count {
        line.clear();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            match column {
                Column::F32(v) => line.push_str(&format!("{:.6}", v[row])),
                Column::U8(v) => line.push_str(&format!("{}", v[row])),
                Column::I32(v) => line.push_str(&format!("{}", v[row])),
            }
        }
        line.push('\n');
        stream.write_str(&line)?;
    }
    Ok(())
}

/// Write one object's rows as packed binary records: f32/u8/i32
/// little-endian in column order, no padding.
pub fn write_rows_binary(stream: &mut OutStream, columns: &[Column], count: usize) -> Result<()> {
    for row in 0..count {
        for column in columns {
            match column {
                Column::F32(v) => stream.write_f32(v[row])?,
                Column::U8(v) => stream.write_u8(v[row])?,
                Column::I32(v) => stream.write_i32(v[row])?,
            }
        }
    }
    Ok(())
}
