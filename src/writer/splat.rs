//! Compact `.splat` binary records.
//!
//! The format (antimatter15-style) has no header or trailer: the file is a
//! flat sequence of 32-byte little-endian records, one per splat. The point
//! count is recoverable only as `file_size / 32`.

use bytemuck::{Pod, Zeroable};

use crate::util::Result;
use crate::writer::stream::OutStream;

/// One 32-byte splat record: world position, linear scale, RGBA, packed
/// rotation quaternion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SplatRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    pub q0: u8,
    pub q1: u8,
    pub q2: u8,
    pub q3: u8,
}

/// Record size on disk.
pub const SPLAT_RECORD_SIZE: usize = 32;

impl SplatRecord {
    /// Write the record as 32 little-endian bytes, no padding.
    pub fn write_to(&self, stream: &mut OutStream) -> Result<()> {
        stream.write_f32(self.x)?;
        stream.write_f32(self.y)?;
        stream.write_f32(self.z)?;
        stream.write_f32(self.sx)?;
        stream.write_f32(self.sy)?;
        stream.write_f32(self.sz)?;
        stream.write_bytes(&[self.r, self.g, self.b, self.a])?;
        stream.write_bytes(&[self.q0, self.q1, self.q2, self.q3])?;
        Ok(())
    }
}
