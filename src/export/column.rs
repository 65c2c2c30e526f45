//! Per-property column extraction.
//!
//! Reads one component of one source attribute into a flat numeric column of
//! `point_count` values, applying the per-type decoding rules (bool -> 0/1,
//! normalized color -> byte). An attribute that is declared in the schema but
//! absent on a given object yields a zero-filled column - required for every
//! object after the first, since the schema comes from the first object only.

use crate::cloud::{AttrData, PointCloud};
use crate::export::schema::{PropertyDescriptor, ScalarKind};
use crate::util::{Error, Result};

/// A flat numeric column, one value per point.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    F32(Vec<f32>),
    U8(Vec<u8>),
    I32(Vec<i32>),
}

impl Column {
    /// Zero-filled column of the given kind.
    pub fn zeros(kind: ScalarKind, count: usize) -> Self {
        match kind {
            ScalarKind::Float32 => Self::F32(vec![0.0; count]),
            ScalarKind::UInt8 => Self::U8(vec![0; count]),
            ScalarKind::Int32 => Self::I32(vec![0; count]),
        }
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I32(v) => v.len(),
        }
    }

    /// True if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map a normalized float to a byte: `round(clamp(v, 0, 1) * 255)`.
///
/// Rounding is half-away-from-zero (`f32::round`), fixed across the library.
#[inline]
pub fn normalized_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Extract one schema property from a point cloud as a flat column.
///
/// Missing attributes zero-fill; present attributes must hold exactly
/// `count * components` values or the export aborts with
/// [`Error::AttributeLengthMismatch`].
pub fn extract(cloud: &PointCloud, desc: &PropertyDescriptor, count: usize) -> Result<Column> {
    let Some(attr) = cloud.attribute(&desc.source) else {
        return Ok(Column::zeros(desc.kind, count));
    };

    let components = attr.data.components();
    let expected = count * components;
    if attr.data.len() != expected {
        return Err(Error::AttributeLengthMismatch {
            attribute: attr.name.clone(),
            expected,
            actual: attr.data.len(),
        });
    }

    // Component index may exceed what this object's type provides (schema
    // drift on later objects); treat it like a missing attribute.
    if desc.component >= components {
        return Ok(Column::zeros(desc.kind, count));
    }

    let column = match desc.kind {
        ScalarKind::Float32 => Column::F32(read_f32(&attr.data, desc.component)),
        ScalarKind::Int32 => match &attr.data {
            AttrData::Int(v) => Column::I32(v.clone()),
            AttrData::Bool(v) => Column::I32(v.iter().map(|&b| i32::from(b)).collect()),
            other => Column::I32(read_f32(other, desc.component).iter().map(|&v| v as i32).collect()),
        },
        ScalarKind::UInt8 => match &attr.data {
            AttrData::Bool(v) => Column::U8(v.iter().map(|&b| u8::from(b)).collect()),
            AttrData::Int(v) => {
                Column::U8(v.iter().map(|&v| v.clamp(0, 255) as u8).collect())
            }
            other => Column::U8(
                read_f32(other, desc.component)
                    .into_iter()
                    .map(normalized_to_byte)
                    .collect(),
            ),
        },
    };

    Ok(column)
}

/// Read one component of an attribute as f32 values, one per point.
/// Interleaved variants are strided out in a single pass.
fn read_f32(data: &AttrData, component: usize) -> Vec<f32> {
    match data {
        AttrData::Float(v) => v.clone(),
        AttrData::Int(v) => v.iter().map(|&i| i as f32).collect(),
        AttrData::Bool(v) => v.iter().map(|&b| f32::from(u8::from(b))).collect(),
        AttrData::Vector3(v) => strided(v, component, 3),
        AttrData::Vector2(v) => strided(v, component, 2),
        AttrData::FloatColor(v) | AttrData::ByteColor(v) | AttrData::Quaternion(v) => {
            strided(v, component, 4)
        }
        // Strings never reach the extractor via a schema, but keep the
        // switch total.
        AttrData::String(v) => vec![0.0; v.len()],
    }
}

/// Stride one component out of an interleaved buffer.
#[inline]
pub(crate) fn strided(v: &[f32], component: usize, stride: usize) -> Vec<f32> {
    v.iter().skip(component).step_by(stride).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &str, kind: ScalarKind, source: &str, component: usize) -> PropertyDescriptor {
        PropertyDescriptor {
            name: name.to_string(),
            kind,
            source: source.to_string(),
            component,
        }
    }

    #[test]
    fn test_missing_attribute_zero_fills() {
        let cloud = PointCloud::new(3);
        let col = extract(&cloud, &desc("nx", ScalarKind::Float32, "normal", 0), 3).unwrap();
        assert_eq!(col, Column::F32(vec![0.0; 3]));

        let col = extract(&cloud, &desc("red", ScalarKind::UInt8, "color", 0), 3).unwrap();
        assert_eq!(col, Column::U8(vec![0; 3]));
    }

    #[test]
    fn test_strided_vector_read() {
        let cloud = PointCloud::new(2).with_attribute(
            "position",
            AttrData::Vector3(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        );
        let y = extract(&cloud, &desc("y", ScalarKind::Float32, "position", 1), 2).unwrap();
        assert_eq!(y, Column::F32(vec![2.0, 5.0]));
    }

    #[test]
    fn test_color_to_byte_scaling() {
        let cloud = PointCloud::new(2).with_attribute(
            "color",
            AttrData::FloatColor(vec![0.0, 0.5, 1.0, 1.0, 1.5, -0.2, 0.25, 1.0]),
        );
        let r = extract(&cloud, &desc("red", ScalarKind::UInt8, "color", 0), 2).unwrap();
        // 0.0 -> 0, 1.5 clamps to 1.0 -> 255
        assert_eq!(r, Column::U8(vec![0, 255]));

        let g = extract(&cloud, &desc("green", ScalarKind::UInt8, "color", 1), 2).unwrap();
        // 0.5 * 255 = 127.5 -> 128 (half away from zero); -0.2 clamps to 0
        assert_eq!(g, Column::U8(vec![128, 0]));
    }

    #[test]
    fn test_color_to_float_unscaled() {
        let cloud = PointCloud::new(1)
            .with_attribute("tint", AttrData::FloatColor(vec![0.25, 0.5, 0.75, 1.0]));
        let b = extract(&cloud, &desc("tint_b", ScalarKind::Float32, "tint", 2), 1).unwrap();
        assert_eq!(b, Column::F32(vec![0.75]));
    }

    #[test]
    fn test_bool_to_byte() {
        let cloud =
            PointCloud::new(3).with_attribute("sel", AttrData::Bool(vec![true, false, true]));
        let col = extract(&cloud, &desc("sel", ScalarKind::UInt8, "sel", 0), 3).unwrap();
        assert_eq!(col, Column::U8(vec![1, 0, 1]));
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let cloud =
            PointCloud::new(3).with_attribute("position", AttrData::Vector3(vec![0.0; 6]));
        let err = extract(&cloud, &desc("x", ScalarKind::Float32, "position", 0), 3).unwrap_err();
        assert!(matches!(err, Error::AttributeLengthMismatch { .. }));
    }
}
