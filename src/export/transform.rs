//! World-space transforms for position and normal columns.
//!
//! Shared by the PLY and splat paths. Positions use the full affine
//! transform (`p' = R*p + T`); normals use the inverse-transpose of the
//! rotation/scale block and are renormalized afterwards. The per-object
//! [`TransformedColumns`] memo keeps each transformed buffer around so the
//! three component descriptors of `position`/`normal` share one pass.

use glam::{Mat4, Vec3};

use crate::cloud::{AttrData, PointCloud};
use crate::util::{normal_matrix, normalize_or_zero, Error, Result};

/// Transform interleaved xyz positions into world space.
pub fn transform_positions(flat: &[f32], world: Mat4) -> Vec<f32> {
    let mut out = Vec::with_capacity(flat.len());
    for p in flat.chunks_exact(3) {
        let v = world.transform_point3(Vec3::new(p[0], p[1], p[2]));
        out.extend_from_slice(&v.to_array());
    }
    out
}

/// Transform interleaved xyz normals into world space using the normal
/// matrix, renormalizing each result. Zero-length normals stay zero.
pub fn transform_normals(flat: &[f32], world: Mat4) -> Vec<f32> {
    let nm = normal_matrix(world);
    let mut out = Vec::with_capacity(flat.len());
    for n in flat.chunks_exact(3) {
        let v = normalize_or_zero(nm * Vec3::new(n[0], n[1], n[2]));
        out.extend_from_slice(&v.to_array());
    }
    out
}

/// Per-object cache of world-space position/normal buffers.
///
/// Built once before the object's rows are written; the column loop reads
/// components straight out of these buffers instead of re-transforming per
/// descriptor.
#[derive(Default)]
pub struct TransformedColumns {
    positions: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
}

impl TransformedColumns {
    /// Compute world-space buffers for one object.
    ///
    /// Returns an empty cache when transforms are not requested or the
    /// object carries no world transform (local space passes through).
    /// Source buffers whose length does not match `count * 3` abort the
    /// export before anything is transformed.
    pub fn build(cloud: &PointCloud, count: usize, apply_transforms: bool) -> Result<Self> {
        if !apply_transforms {
            return Ok(Self::default());
        }
        let Some(world) = cloud.world_transform else {
            return Ok(Self::default());
        };

        let mut cache = Self::default();
        for (name, as_normals) in [("position", false), ("normal", true)] {
            let Some(attr) = cloud.attribute(name) else {
                continue;
            };
            let AttrData::Vector3(v) = &attr.data else {
                continue;
            };
            if v.len() != count * 3 {
                return Err(Error::AttributeLengthMismatch {
                    attribute: attr.name.clone(),
                    expected: count * 3,
                    actual: v.len(),
                });
            }
            let buf = if as_normals {
                transform_normals(v, world)
            } else {
                transform_positions(v, world)
            };
            if as_normals {
                cache.normals = Some(buf);
            } else {
                cache.positions = Some(buf);
            }
        }

        Ok(cache)
    }

    /// Look up a transformed buffer by source attribute name.
    pub fn get(&self, source: &str) -> Option<&[f32]> {
        match source {
            "position" => self.positions.as_deref(),
            "normal" => self.normals.as_deref(),
            _ => None,
        }
    }
}
