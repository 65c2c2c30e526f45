//! # splatply
//!
//! Export of in-memory point clouds and 3D Gaussian splats to on-disk
//! formats: textual or binary PLY, and the compact fixed-record `.splat`
//! binary.
//!
//! ## Modules
//!
//! - [`util`] - Error handling and transform math
//! - [`cloud`] - The point-cloud data model (attributes, semantic types)
//! - [`export`] - Schema derivation, column extraction, splat conversions,
//!   and the public export entry points
//! - [`writer`] - File-format framing (PLY header/body, `.splat` records)
//!
//! ## Example
//!
//! ```no_run
//! use splatply::{export_ply, AttrData, ExportOptions, PointCloud};
//!
//! let cloud = PointCloud::new(2)
//!     .with_attribute("position", AttrData::Vector3(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]))
//!     .with_attribute("radius", AttrData::Float(vec![0.05, 0.07]));
//!
//! let summary = export_ply(&[cloud], "points.ply", &ExportOptions::default())?;
//! println!("{summary}");
//! # Ok::<(), splatply::Error>(())
//! ```

pub mod cloud;
pub mod export;
pub mod util;
pub mod writer;

// Re-export the public surface.
pub use cloud::{AttrData, AttrDomain, Attribute, PointCloud};
pub use export::{
    export, export_ply, export_splat, export_splat_ply, ExportOptions, ExportSummary, Format,
};
pub use util::{Error, Result};
