//! Buffered output stream with commit-on-success semantics.
//!
//! All bytes go to a sibling temporary file; [`OutStream::commit`] renames
//! it onto the destination. If the stream is dropped without a commit (any
//! error path), the temporary file is removed, so a failed export never
//! leaves a half-written file at the destination.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::util::Result;

/// Output stream for one export call.
pub struct OutStream {
    writer: Option<BufWriter<File>>,
    tmp_path: PathBuf,
    dest_path: PathBuf,
    committed: bool,
}

impl OutStream {
    /// Open the stream, creating the sibling temporary file.
    pub fn create(dest: impl AsRef<Path>) -> Result<Self> {
        let dest_path = dest.as_ref().to_path_buf();
        let mut tmp_os = dest_path.clone().into_os_string();
        tmp_os.push(".tmp");
        let tmp_path = PathBuf::from(tmp_os);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;

        Ok(Self {
            writer: Some(BufWriter::with_capacity(1024 * 1024, file)),
            tmp_path,
            dest_path,
            committed: false,
        })
    }

    #[inline]
    fn writer(&mut self) -> &mut BufWriter<File> {
        // Only None after commit() consumed self.
        self.writer.as_mut().expect("stream already closed")
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer().write_all(data)?;
        Ok(())
    }

    /// Write a UTF-8 string verbatim.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.writer().write_all(s.as_bytes())?;
        Ok(())
    }

    /// Write an f32 value (little-endian).
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.writer().write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write an i32 value (little-endian).
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer().write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer().write_u8(value)?;
        Ok(())
    }

    /// Flush, close, and rename the temporary file onto the destination.
    pub fn commit(mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        fs::rename(&self.tmp_path, &self.dest_path)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for OutStream {
    fn drop(&mut self) {
        // Close the handle before unlinking (required on Windows).
        drop(self.writer.take());
        if !self.committed {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_commit_renames_onto_destination() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join("out.ply");

        let mut stream = OutStream::create(&dest).expect("create");
        stream.write_str("hello").expect("write");
        stream.commit().expect("commit");

        assert_eq!(fs::read(&dest).expect("read"), b"hello");
        assert!(!dir.path().join("out.ply.tmp").exists());
    }

    #[test]
    fn test_drop_without_commit_cleans_up() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join("out.ply");

        {
            let mut stream = OutStream::create(&dest).expect("create");
            stream.write_str("partial").expect("write");
            // Dropped uncommitted.
        }

        assert!(!dest.exists());
        assert!(!dir.path().join("out.ply.tmp").exists());
    }

    #[test]
    fn test_little_endian_scalars() {
        let dir = tempdir().expect("tempdir");
        let dest = dir.path().join("bin");

        let mut stream = OutStream::create(&dest).expect("create");
        stream.write_f32(1.0).expect("f32");
        stream.write_i32(-2).expect("i32");
        stream.write_u8(7).expect("u8");
        stream.commit().expect("commit");

        let bytes = fs::read(&dest).expect("read");
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-2i32).to_le_bytes());
        assert_eq!(bytes[8], 7);
    }
}
