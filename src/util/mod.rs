//! Utility types and functions shared across the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math helpers (normal matrix, safe normalization) and glam re-exports

mod error;
mod math;

pub use error::*;
pub use math::*;
