//! Serialization layer: output stream and file-format framing.
//!
//! Owns the byte-exact external contracts: PLY header + ASCII/binary body,
//! and the headerless 32-byte `.splat` record stream. Consumes columns
//! produced by the export engine.

pub mod ply;
pub mod splat;
pub mod stream;

pub use splat::{SplatRecord, SPLAT_RECORD_SIZE};
pub use stream::OutStream;
