//! In-memory point cloud data model.
//!
//! A [`PointCloud`] is a set of named per-point attributes plus an optional
//! world transform. Attributes carry one of a closed set of semantic types
//! ([`AttrData`]); only [`AttrDomain::Point`] attributes participate in
//! export. The model is read-only to the export engine: nothing here is
//! mutated during a write.

use glam::Mat4;

/// The granularity an attribute is defined over.
///
/// Only per-point attributes are exported; anything else is skipped by the
/// schema builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttrDomain {
    /// One value per point.
    #[default]
    Point,
    /// Any other granularity (per-object, per-spline, ...).
    Other,
}

/// Per-point attribute payload - a closed set of semantic types.
///
/// Multi-component variants store their values as interleaved flat buffers
/// of length `point_count * components` (e.g. `x0 y0 z0 x1 y1 z1 ...`).
/// Color values are normalized floats in `[0, 1]` regardless of whether the
/// attribute originated as float or byte color. Quaternions are stored in
/// w-x-y-z order.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrData {
    /// Scalar float32
    Float(Vec<f32>),
    /// Scalar int32
    Int(Vec<i32>),
    /// Scalar boolean (exported as byte 0/1)
    Bool(Vec<bool>),
    /// 3-component float vector, interleaved
    Vector3(Vec<f32>),
    /// 2-component float vector, interleaved
    Vector2(Vec<f32>),
    /// RGBA float color, normalized, interleaved
    FloatColor(Vec<f32>),
    /// RGBA byte color, stored normalized, interleaved
    ByteColor(Vec<f32>),
    /// Quaternion (w, x, y, z), interleaved
    Quaternion(Vec<f32>),
    /// Per-point strings (never exported)
    String(Vec<String>),
}

impl AttrData {
    /// Number of scalar components per point.
    #[inline]
    pub const fn components(&self) -> usize {
        match self {
            Self::Float(_) | Self::Int(_) | Self::Bool(_) | Self::String(_) => 1,
            Self::Vector2(_) => 2,
            Self::Vector3(_) => 3,
            Self::FloatColor(_) | Self::ByteColor(_) | Self::Quaternion(_) => 4,
        }
    }

    /// Total number of stored scalar values.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Vector3(v) | Self::Vector2(v) => v.len(),
            Self::FloatColor(v) | Self::ByteColor(v) | Self::Quaternion(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    /// True if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name, for diagnostics.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Vector3(_) => "vector3",
            Self::Vector2(_) => "vector2",
            Self::FloatColor(_) => "float_color",
            Self::ByteColor(_) => "byte_color",
            Self::Quaternion(_) => "quaternion",
            Self::String(_) => "string",
        }
    }
}

/// A named per-point attribute.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub name: String,
    pub domain: AttrDomain,
    pub data: AttrData,
}

impl Attribute {
    /// Create a point-domain attribute.
    pub fn point(name: impl Into<String>, data: AttrData) -> Self {
        Self {
            name: name.into(),
            domain: AttrDomain::Point,
            data,
        }
    }
}

/// A point cloud: point count, ordered attribute set, optional world
/// transform.
///
/// Attribute order is preserved; the schema builder appends generic
/// attributes in this order, so it is part of the output contract.
/// Invariant: every point-domain attribute holds `point_count` values
/// (times its component count) - violations surface as
/// [`Error::AttributeLengthMismatch`](crate::util::Error) at export time.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    pub point_count: u32,
    pub attributes: Vec<Attribute>,
    pub world_transform: Option<Mat4>,
}

impl PointCloud {
    /// Create an empty cloud with a given point count.
    pub fn new(point_count: u32) -> Self {
        Self {
            point_count,
            attributes: Vec::new(),
            world_transform: None,
        }
    }

    /// Append a point-domain attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, data: AttrData) -> Self {
        self.attributes.push(Attribute::point(name, data));
        self
    }

    /// Set the world transform (builder style).
    pub fn with_transform(mut self, world: Mat4) -> Self {
        self.world_transform = Some(world);
        self
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// True if an attribute with this name exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        assert_eq!(AttrData::Float(vec![]).components(), 1);
        assert_eq!(AttrData::Vector2(vec![]).components(), 2);
        assert_eq!(AttrData::Vector3(vec![]).components(), 3);
        assert_eq!(AttrData::FloatColor(vec![]).components(), 4);
        assert_eq!(AttrData::Quaternion(vec![]).components(), 4);
    }

    #[test]
    fn test_attribute_lookup() {
        let cloud = PointCloud::new(2)
            .with_attribute("position", AttrData::Vector3(vec![0.0; 6]))
            .with_attribute("radius", AttrData::Float(vec![0.5, 0.7]));

        assert!(cloud.has_attribute("position"));
        assert!(cloud.has_attribute("radius"));
        assert!(!cloud.has_attribute("normal"));
        assert_eq!(
            cloud.attribute("radius").unwrap().data.type_name(),
            "float"
        );
    }
}
