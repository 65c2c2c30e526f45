//! The export engine: schema derivation, column extraction, transforms,
//! splat conversions, and the public entry points.
//!
//! Each export call is self-contained: the schema comes from the first
//! object and is reused for the whole batch, all buffers live for the call
//! only, and the output file appears at the destination only after a
//! successful write (temp file + rename).

pub mod column;
pub mod gaussian;
pub mod schema;
pub mod transform;

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::cloud::{AttrData, PointCloud};
use crate::export::column::Column;
use crate::export::schema::{build_schema, count_f_rest, splat_property_names, PropertyDescriptor};
use crate::export::transform::{transform_positions, TransformedColumns};
use crate::util::{Error, Result};
use crate::writer::ply::{write_header, write_rows_ascii, write_rows_binary};
use crate::writer::{OutStream, SplatRecord};

/// Output file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Generic point-cloud PLY: schema derived from the attribute set.
    Ply,
    /// Full-precision Gaussian splat PLY (standard 3DGS property layout).
    SplatPly,
    /// Compact 32-byte-record `.splat` binary.
    Splat,
}

/// Options shared by all export paths.
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    /// Write ASCII PLY instead of binary. Ignored by [`Format::Splat`],
    /// which is binary-only.
    pub use_ascii: bool,
    /// Apply each object's world transform to positions (and normals, on
    /// the generic PLY path).
    pub apply_transforms: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            use_ascii: false,
            apply_transforms: true,
        }
    }
}

/// Success summary of one export call.
#[derive(Clone, Copy, Debug)]
pub struct ExportSummary {
    pub points_written: u64,
    pub format: Format,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.format {
            Format::Ply => "points",
            Format::SplatPly | Format::Splat => "splats",
        };
        write!(f, "Exported {} {}.", self.points_written, unit)
    }
}

/// Export point clouds to the given format.
pub fn export(
    clouds: &[PointCloud],
    dest: impl AsRef<Path>,
    format: Format,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    match format {
        Format::Ply => export_ply(clouds, dest, options),
        Format::SplatPly => export_splat_ply(clouds, dest, options),
        Format::Splat => export_splat(clouds, dest, options),
    }
}

/// Export point clouds to a PLY file, preserving all point-domain
/// attributes of the first object's schema.
pub fn export_ply(
    clouds: &[PointCloud],
    dest: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let reference = clouds.first().ok_or(Error::EmptyInput)?;
    let schema = build_schema(reference)?;
    let total = total_points(clouds);

    let dest = dest.as_ref();
    info!(
        objects = clouds.len(),
        points = total,
        ascii = options.use_ascii,
        "exporting PLY to {}",
        dest.display()
    );

    let mut stream = OutStream::create(dest)?;
    write_header(
        &mut stream,
        options.use_ascii,
        total,
        schema.iter().map(|p| (p.kind.ply_name(), p.name.as_str())),
    )?;

    for cloud in clouds {
        let count = cloud.point_count as usize;
        if count == 0 {
            continue;
        }
        debug!(points = count, "writing object rows");

        let cache = TransformedColumns::build(cloud, count, options.apply_transforms)?;
        let columns = object_columns(cloud, &schema, count, &cache)?;

        if options.use_ascii {
            write_rows_ascii(&mut stream, &columns, count)?;
        } else {
            write_rows_binary(&mut stream, &columns, count)?;
        }
    }

    stream.commit()?;
    Ok(ExportSummary {
        points_written: total,
        format: Format::Ply,
    })
}

/// Export Gaussian splat objects to a standard 3DGS PLY file.
///
/// All splat fields (`f_dc`, `f_rest`, `opacity`, `scale`, `rot`) are
/// written as raw float32. Transforms affect positions only; scale and
/// rotation are written as stored.
pub fn export_splat_ply(
    clouds: &[PointCloud],
    dest: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let reference = clouds.first().ok_or(Error::EmptyInput)?;
    if !reference.has_attribute("position") {
        return Err(Error::MissingPosition);
    }

    let f_rest_count = count_f_rest(reference);
    let names = splat_property_names(f_rest_count);
    let total = total_points(clouds);

    let dest = dest.as_ref();
    info!(
        objects = clouds.len(),
        points = total,
        f_rest = f_rest_count,
        "exporting splat PLY to {}",
        dest.display()
    );

    let mut stream = OutStream::create(dest)?;
    write_header(
        &mut stream,
        options.use_ascii,
        total,
        names.iter().map(|n| ("float", n.as_str())),
    )?;

    for cloud in clouds {
        let count = cloud.point_count as usize;
        if count == 0 {
            continue;
        }

        let pos = position_buffer(cloud, count, options.apply_transforms)?;
        let mut columns = Vec::with_capacity(names.len());
        for c in 0..3 {
            columns.push(Column::F32(column::strided(&pos, c, 3)));
        }
        // nx/ny/nz carry no meaning for 3DGS; written as zeros.
        for _ in 0..3 {
            columns.push(Column::F32(vec![0.0; count]));
        }
        for i in 0..3 {
            columns.push(Column::F32(float_column(cloud, &format!("f_dc_{i}"), count)?));
        }
        for i in 0..f_rest_count {
            columns.push(Column::F32(float_column(cloud, &format!("f_rest_{i}"), count)?));
        }
        columns.push(Column::F32(float_column(cloud, "opacity", count)?));
        for i in 0..3 {
            columns.push(Column::F32(float_column(cloud, &format!("scale_{i}"), count)?));
        }
        for i in 0..4 {
            columns.push(Column::F32(float_column(cloud, &format!("rot_{i}"), count)?));
        }

        if options.use_ascii {
            write_rows_ascii(&mut stream, &columns, count)?;
        } else {
            write_rows_binary(&mut stream, &columns, count)?;
        }
    }

    stream.commit()?;
    Ok(ExportSummary {
        points_written: total,
        format: Format::SplatPly,
    })
}

/// Export Gaussian splat objects to the compact `.splat` binary format.
///
/// Scales are exponentiated to linear, opacity passes through a sigmoid,
/// color is baked from the 0th-order SH coefficient, and the rotation
/// quaternion is normalized and packed into bytes. Higher-order SH
/// (`f_rest_*`) is discarded - no view-dependent shading.
pub fn export_splat(
    clouds: &[PointCloud],
    dest: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let reference = clouds.first().ok_or(Error::EmptyInput)?;
    if !reference.has_attribute("position") {
        return Err(Error::MissingPosition);
    }

    let total = total_points(clouds);
    let dest = dest.as_ref();
    info!(
        objects = clouds.len(),
        points = total,
        "exporting .splat to {}",
        dest.display()
    );

    let mut stream = OutStream::create(dest)?;

    for cloud in clouds {
        let count = cloud.point_count as usize;
        if count == 0 {
            continue;
        }

        let pos = position_buffer(cloud, count, options.apply_transforms)?;
        let log_scales: Vec<Vec<f32>> = (0..3)
            .map(|i| float_column(cloud, &format!("scale_{i}"), count))
            .collect::<Result<_>>()?;
        let f_dc: Vec<Vec<f32>> = (0..3)
            .map(|i| float_column(cloud, &format!("f_dc_{i}"), count))
            .collect::<Result<_>>()?;
        let opacity = float_column(cloud, "opacity", count)?;
        let rot: Vec<Vec<f32>> = (0..4)
            .map(|i| float_column(cloud, &format!("rot_{i}"), count))
            .collect::<Result<_>>()?;

        for i in 0..count {
            let rgba = [
                gaussian::sh0_to_byte(f_dc[0][i]),
                gaussian::sh0_to_byte(f_dc[1][i]),
                gaussian::sh0_to_byte(f_dc[2][i]),
                gaussian::alpha_byte(opacity[i]),
            ];
            let q = gaussian::quat_to_bytes([rot[0][i], rot[1][i], rot[2][i], rot[3][i]]);

            let record = SplatRecord {
                x: pos[i * 3],
                y: pos[i * 3 + 1],
                z: pos[i * 3 + 2],
                sx: gaussian::scale_linear(log_scales[0][i]),
                sy: gaussian::scale_linear(log_scales[1][i]),
                sz: gaussian::scale_linear(log_scales[2][i]),
                r: rgba[0],
                g: rgba[1],
                b: rgba[2],
                a: rgba[3],
                q0: q[0],
                q1: q[1],
                q2: q[2],
                q3: q[3],
            };
            record.write_to(&mut stream)?;
        }
    }

    stream.commit()?;
    Ok(ExportSummary {
        points_written: total,
        format: Format::Splat,
    })
}

/// Sum of point counts across all objects, computed before any row is
/// written (the PLY header needs it up front).
fn total_points(clouds: &[PointCloud]) -> u64 {
    clouds.iter().map(|c| u64::from(c.point_count)).sum()
}

/// Assemble one object's columns in schema order, reading world-space
/// buffers out of the per-object transform cache where available.
fn object_columns(
    cloud: &PointCloud,
    schema: &[PropertyDescriptor],
    count: usize,
    cache: &TransformedColumns,
) -> Result<Vec<Column>> {
    schema
        .iter()
        .map(|desc| {
            if let Some(buf) = cache.get(&desc.source) {
                Ok(Column::F32(column::strided(buf, desc.component, 3)))
            } else {
                column::extract(cloud, desc, count)
            }
        })
        .collect()
}

/// Interleaved xyz position buffer for the splat paths, transformed into
/// world space when requested. A missing position attribute zero-fills
/// (objects after the first may lack it).
fn position_buffer(cloud: &PointCloud, count: usize, apply_transforms: bool) -> Result<Vec<f32>> {
    let Some(attr) = cloud.attribute("position") else {
        return Ok(vec![0.0; count * 3]);
    };
    let AttrData::Vector3(v) = &attr.data else {
        return Ok(vec![0.0; count * 3]);
    };
    if v.len() != count * 3 {
        return Err(Error::AttributeLengthMismatch {
            attribute: attr.name.clone(),
            expected: count * 3,
            actual: v.len(),
        });
    }

    match cloud.world_transform {
        Some(world) if apply_transforms => Ok(transform_positions(v, world)),
        _ => Ok(v.clone()),
    }
}

/// Scalar float column for the splat paths: missing attributes or
/// non-float types zero-fill, mismatched lengths abort.
fn float_column(cloud: &PointCloud, name: &str, count: usize) -> Result<Vec<f32>> {
    let Some(attr) = cloud.attribute(name) else {
        return Ok(vec![0.0; count]);
    };
    let AttrData::Float(v) = &attr.data else {
        return Ok(vec![0.0; count]);
    };
    if v.len() != count {
        return Err(Error::AttributeLengthMismatch {
            attribute: attr.name.clone(),
            expected: count,
            actual: v.len(),
        });
    }
    Ok(v.clone())
}
