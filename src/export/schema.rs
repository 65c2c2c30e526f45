//! Output property schema derivation.
//!
//! Turns an unordered attribute set into the ordered list of scalar PLY
//! properties to write, each mapped back to its source attribute and
//! component. The schema is computed once from the first exported object
//! and reused for the whole batch; later objects that lack an attribute
//! get zero-filled columns instead of an error.

use crate::cloud::{AttrData, AttrDomain, PointCloud};
use crate::util::{Error, Result};

/// Scalar storage kind of one output property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    Float32,
    UInt8,
    Int32,
}

impl ScalarKind {
    /// PLY header type name.
    #[inline]
    pub const fn ply_name(self) -> &'static str {
        match self {
            Self::Float32 => "float",
            Self::UInt8 => "uchar",
            Self::Int32 => "int",
        }
    }
}

/// One scalar output property: its name in the file, storage kind, and the
/// source attribute/component it reads from.
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    /// Property name as written to the PLY header.
    pub name: String,
    /// Output storage kind.
    pub kind: ScalarKind,
    /// Source attribute name on the point cloud.
    pub source: String,
    /// Component index within the source attribute.
    pub component: usize,
}

impl PropertyDescriptor {
    fn new(name: impl Into<String>, kind: ScalarKind, source: &str, component: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            source: source.to_string(),
            component,
        }
    }
}

/// Build the PLY property schema from a reference point cloud.
///
/// Precedence is fixed:
/// 1. `position` (mandatory) -> `x, y, z` float
/// 2. `normal` (optional) -> `nx, ny, nz` float
/// 3. `color`, else `Color` (optional) -> `red, green, blue` uchar
/// 4. all remaining point-domain attributes, in attribute order, expanded
///    per semantic type; strings and non-point domains are skipped.
pub fn build_schema(cloud: &PointCloud) -> Result<Vec<PropertyDescriptor>> {
    let mut props = Vec::new();
    let mut handled: Vec<&str> = Vec::new();

    // Position (mandatory)
    if !cloud.has_attribute("position") {
        return Err(Error::MissingPosition);
    }
    for (i, name) in ["x", "y", "z"].into_iter().enumerate() {
        props.push(PropertyDescriptor::new(name, ScalarKind::Float32, "position", i));
    }
    handled.push("position");

    // Normal (optional, canonical PLY names)
    if cloud.has_attribute("normal") {
        for (i, name) in ["nx", "ny", "nz"].into_iter().enumerate() {
            props.push(PropertyDescriptor::new(name, ScalarKind::Float32, "normal", i));
        }
        handled.push("normal");
    }

    // Color (optional, canonical PLY names red/green/blue)
    if let Some(color) = cloud.attribute("color").or_else(|| cloud.attribute("Color")) {
        for (i, name) in ["red", "green", "blue"].into_iter().enumerate() {
            props.push(PropertyDescriptor::new(name, ScalarKind::UInt8, &color.name, i));
        }
        handled.push(&color.name);
    }

    // All remaining point-domain attributes, in attribute-set order.
    for attr in &cloud.attributes {
        if attr.domain != AttrDomain::Point || handled.contains(&attr.name.as_str()) {
            continue;
        }
        let name = attr.name.as_str();

        match &attr.data {
            AttrData::Float(_) => {
                props.push(PropertyDescriptor::new(name, ScalarKind::Float32, name, 0));
            }
            AttrData::Int(_) => {
                props.push(PropertyDescriptor::new(name, ScalarKind::Int32, name, 0));
            }
            AttrData::Bool(_) => {
                props.push(PropertyDescriptor::new(name, ScalarKind::UInt8, name, 0));
            }
            AttrData::Vector3(_) => {
                for (i, s) in ["_x", "_y", "_z"].into_iter().enumerate() {
                    props.push(PropertyDescriptor::new(
                        format!("{name}{s}"),
                        ScalarKind::Float32,
                        name,
                        i,
                    ));
                }
            }
            AttrData::Vector2(_) => {
                for (i, s) in ["_u", "_v"].into_iter().enumerate() {
                    props.push(PropertyDescriptor::new(
                        format!("{name}{s}"),
                        ScalarKind::Float32,
                        name,
                        i,
                    ));
                }
            }
            AttrData::FloatColor(_) => {
                for (i, s) in ["_r", "_g", "_b", "_a"].into_iter().enumerate() {
                    props.push(PropertyDescriptor::new(
                        format!("{name}{s}"),
                        ScalarKind::Float32,
                        name,
                        i,
                    ));
                }
            }
            AttrData::ByteColor(_) => {
                for (i, s) in ["_r", "_g", "_b", "_a"].into_iter().enumerate() {
                    props.push(PropertyDescriptor::new(
                        format!("{name}{s}"),
                        ScalarKind::UInt8,
                        name,
                        i,
                    ));
                }
            }
            AttrData::Quaternion(_) => {
                for (i, s) in ["_w", "_x", "_y", "_z"].into_iter().enumerate() {
                    props.push(PropertyDescriptor::new(
                        format!("{name}{s}"),
                        ScalarKind::Float32,
                        name,
                        i,
                    ));
                }
            }
            // Strings and anything unrecognized are skipped silently.
            AttrData::String(_) => {}
        }
    }

    Ok(props)
}

/// Count the `f_rest_N` scalar attributes present, probing sequentially
/// from 0 until the first missing index.
pub fn count_f_rest(cloud: &PointCloud) -> usize {
    let mut count = 0;
    while cloud.has_attribute(&format!("f_rest_{count}")) {
        count += 1;
    }
    count
}

/// Ordered property names for a full-precision Gaussian splat PLY, all
/// declared as `property float` (standard 3DGS layout).
pub fn splat_property_names(f_rest_count: usize) -> Vec<String> {
    let mut names: Vec<String> = ["x", "y", "z", "nx", "ny", "nz"]
        .into_iter()
        .map(str::to_string)
        .collect();
    names.extend((0..3).map(|i| format!("f_dc_{i}")));
    names.extend((0..f_rest_count).map(|i| format!("f_rest_{i}")));
    names.push("opacity".to_string());
    names.extend((0..3).map(|i| format!("scale_{i}")));
    names.extend((0..4).map(|i| format!("rot_{i}")));
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Attribute;

    fn positions(n: usize) -> AttrData {
        AttrData::Vector3(vec![0.0; n * 3])
    }

    #[test]
    fn test_position_only() {
        let cloud = PointCloud::new(4).with_attribute("position", positions(4));
        let schema = build_schema(&cloud).unwrap();

        let names: Vec<&str> = schema.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert!(schema.iter().all(|p| p.kind == ScalarKind::Float32));
    }

    #[test]
    fn test_missing_position_is_error() {
        let cloud = PointCloud::new(4).with_attribute("radius", AttrData::Float(vec![0.0; 4]));
        assert!(matches!(build_schema(&cloud), Err(Error::MissingPosition)));
    }

    #[test]
    fn test_normal_and_color_precedence() {
        let cloud = PointCloud::new(1)
            .with_attribute("color", AttrData::FloatColor(vec![0.0; 4]))
            .with_attribute("position", positions(1))
            .with_attribute("normal", positions(1));
        let schema = build_schema(&cloud).unwrap();

        let names: Vec<&str> = schema.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "y", "z", "nx", "ny", "nz", "red", "green", "blue"]);
        assert_eq!(schema[6].kind, ScalarKind::UInt8);
        assert_eq!(schema[6].source, "color");
    }

    #[test]
    fn test_capital_color_fallback() {
        let cloud = PointCloud::new(1)
            .with_attribute("position", positions(1))
            .with_attribute("Color", AttrData::ByteColor(vec![0.0; 4]));
        let schema = build_schema(&cloud).unwrap();

        assert_eq!(schema[3].name, "red");
        assert_eq!(schema[3].source, "Color");
    }

    /// Table-driven expansion over all nine semantic types.
    #[test]
    fn test_generic_expansion_all_types() {
        let cases: &[(&str, AttrData, &[&str], ScalarKind)] = &[
            ("f", AttrData::Float(vec![0.0]), &["f"], ScalarKind::Float32),
            ("i", AttrData::Int(vec![0]), &["i"], ScalarKind::Int32),
            ("b", AttrData::Bool(vec![true]), &["b"], ScalarKind::UInt8),
            (
                "v3",
                AttrData::Vector3(vec![0.0; 3]),
                &["v3_x", "v3_y", "v3_z"],
                ScalarKind::Float32,
            ),
            (
                "v2",
                AttrData::Vector2(vec![0.0; 2]),
                &["v2_u", "v2_v"],
                ScalarKind::Float32,
            ),
            (
                "fc",
                AttrData::FloatColor(vec![0.0; 4]),
                &["fc_r", "fc_g", "fc_b", "fc_a"],
                ScalarKind::Float32,
            ),
            (
                "bc",
                AttrData::ByteColor(vec![0.0; 4]),
                &["bc_r", "bc_g", "bc_b", "bc_a"],
                ScalarKind::UInt8,
            ),
            (
                "q",
                AttrData::Quaternion(vec![0.0; 4]),
                &["q_w", "q_x", "q_y", "q_z"],
                ScalarKind::Float32,
            ),
            ("s", AttrData::String(vec!["x".to_string()]), &[], ScalarKind::Float32),
        ];

        for (attr_name, data, expected, kind) in cases {
            let cloud = PointCloud::new(1)
                .with_attribute("position", positions(1))
                .with_attribute(*attr_name, data.clone());
            let schema = build_schema(&cloud).unwrap();

            let names: Vec<&str> = schema[3..].iter().map(|p| p.name.as_str()).collect();
            assert_eq!(&names, expected, "expansion of {attr_name}");
            for p in &schema[3..] {
                assert_eq!(p.kind, *kind, "kind of {attr_name}");
                assert_eq!(p.source, *attr_name);
            }
        }
    }

    #[test]
    fn test_non_point_domain_skipped() {
        let mut cloud = PointCloud::new(1).with_attribute("position", positions(1));
        cloud.attributes.push(Attribute {
            name: "island".to_string(),
            domain: AttrDomain::Other,
            data: AttrData::Int(vec![3]),
        });
        let schema = build_schema(&cloud).unwrap();
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_splat_property_names() {
        let names = splat_property_names(2);
        assert_eq!(
            names,
            [
                "x", "y", "z", "nx", "ny", "nz", "f_dc_0", "f_dc_1", "f_dc_2", "f_rest_0",
                "f_rest_1", "opacity", "scale_0", "scale_1", "scale_2", "rot_0", "rot_1",
                "rot_2", "rot_3"
            ]
        );
    }

    #[test]
    fn test_count_f_rest_stops_at_gap() {
        let cloud = PointCloud::new(1)
            .with_attribute("position", positions(1))
            .with_attribute("f_rest_0", AttrData::Float(vec![0.0]))
            .with_attribute("f_rest_1", AttrData::Float(vec![0.0]))
            .with_attribute("f_rest_3", AttrData::Float(vec![0.0]));
        assert_eq!(count_f_rest(&cloud), 2);
    }
}
