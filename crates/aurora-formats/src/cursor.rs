//! Seekable typed reader used by every format parser
//!
//! Wraps a `Read + Seek` source and offers fixed-width reads, exact-length
//! and NUL-terminated string reads, and signature checks. All reads consume
//! forward from the current position. The concrete archive readers fix
//! little-endian; big-endian reads stay available for legacy script data.

use crate::error::{FormatError, Result};
use byteorder::{ByteOrder, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Seekable byte reader over an opened container (file or in-memory buffer).
pub struct BinaryCursor<R: Read + Seek> {
    inner: R,
    len: u64,
}

impl BinaryCursor<BufReader<File>> {
    /// Open a file-backed cursor.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            inner: BufReader::new(file),
            len,
        })
    }
}

impl BinaryCursor<Cursor<Vec<u8>>> {
    /// Wrap an in-memory buffer.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self {
            inner: Cursor::new(data),
            len,
        }
    }
}

impl<R: Read + Seek> BinaryCursor<R> {
    /// Wrap an arbitrary source whose total length is known.
    pub fn new(inner: R, len: u64) -> Self {
        Self { inner, len }
    }

    /// Total length of the underlying source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current position.
    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Skip `n` bytes forward.
    pub fn ignore(&mut self, n: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    fn check_remaining(&mut self, needed: usize) -> Result<()> {
        let pos = self.inner.stream_position()?;
        if pos + needed as u64 > self.len {
            return Err(FormatError::EndOfStream {
                offset: pos,
                needed,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.check_remaining(1)?;
        Ok(self.inner.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.check_remaining(1)?;
        Ok(self.inner.read_i8()?)
    }

    pub fn read_u16<B: ByteOrder>(&mut self) -> Result<u16> {
        self.check_remaining(2)?;
        Ok(self.inner.read_u16::<B>()?)
    }

    pub fn read_i16<B: ByteOrder>(&mut self) -> Result<i16> {
        self.check_remaining(2)?;
        Ok(self.inner.read_i16::<B>()?)
    }

    pub fn read_u32<B: ByteOrder>(&mut self) -> Result<u32> {
        self.check_remaining(4)?;
        Ok(self.inner.read_u32::<B>()?)
    }

    pub fn read_i32<B: ByteOrder>(&mut self) -> Result<i32> {
        self.check_remaining(4)?;
        Ok(self.inner.read_i32::<B>()?)
    }

    pub fn read_u64<B: ByteOrder>(&mut self) -> Result<u64> {
        self.check_remaining(8)?;
        Ok(self.inner.read_u64::<B>()?)
    }

    pub fn read_i64<B: ByteOrder>(&mut self) -> Result<i64> {
        self.check_remaining(8)?;
        Ok(self.inner.read_i64::<B>()?)
    }

    pub fn read_f32<B: ByteOrder>(&mut self) -> Result<f32> {
        self.check_remaining(4)?;
        Ok(self.inner.read_f32::<B>()?)
    }

    /// Read exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.check_remaining(n)?;
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-length string field, truncating at the first NUL.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Read a NUL-terminated string from the current position.
    pub fn read_cstring(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            let b = self.read_u8()?;
            if b == 0 {
                break;
            }
            bytes.push(b);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a NUL-terminated string at `off`, restoring the current position.
    pub fn read_cstring_at(&mut self, off: u64) -> Result<String> {
        let saved = self.tell()?;
        self.seek(off)?;
        let s = self.read_cstring()?;
        self.seek(saved)?;
        Ok(s)
    }

    /// Read an exact-length string at `off`, restoring the current position.
    pub fn read_string_at(&mut self, off: u64, n: usize) -> Result<String> {
        let saved = self.tell()?;
        self.seek(off)?;
        let s = self.read_string(n)?;
        self.seek(saved)?;
        Ok(s)
    }

    /// Read `len(expected)` bytes and compare against the expected signature.
    pub fn check_signature(&mut self, expected: &str) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected.as_bytes() {
            return Err(FormatError::SignatureMismatch {
                expected: expected.to_string(),
                actual: String::from_utf8_lossy(&actual).into_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn typed_reads_consume_forward() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x1234_5678u32.to_le_bytes());
        data.extend_from_slice(&0xBEEFu16.to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        let mut cur = BinaryCursor::from_vec(data);

        assert_eq!(cur.read_u32::<LittleEndian>().unwrap(), 0x1234_5678);
        assert_eq!(cur.read_u16::<LittleEndian>().unwrap(), 0xBEEF);
        assert!((cur.read_f32::<LittleEndian>().unwrap() - 1.5).abs() < f32::EPSILON);
        assert_eq!(cur.tell().unwrap(), 10);
    }

    #[test]
    fn big_endian_reads() {
        let mut cur = BinaryCursor::from_vec(vec![0x00, 0x00, 0x00, 0x2A]);
        assert_eq!(cur.read_u32::<BigEndian>().unwrap(), 42);
    }

    #[test]
    fn read_past_end_is_end_of_stream() {
        let mut cur = BinaryCursor::from_vec(vec![1, 2]);
        cur.read_u8().unwrap();
        let err = cur.read_u32::<LittleEndian>().unwrap_err();
        assert!(matches!(err, FormatError::EndOfStream { offset: 1, needed: 4 }));
    }

    #[test]
    fn signature_mismatch_carries_both_texts() {
        let mut cur = BinaryCursor::from_vec(b"BIFFV1  rest".to_vec());
        let err = cur.check_signature("KEY V1  ").unwrap_err();
        match err {
            FormatError::SignatureMismatch { expected, actual } => {
                assert_eq!(expected, "KEY V1  ");
                assert_eq!(actual, "BIFFV1  ");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fixed_string_truncates_at_nul() {
        let mut cur = BinaryCursor::from_vec(b"abc\0\0\0\0\0XYZ".to_vec());
        assert_eq!(cur.read_string(8).unwrap(), "abc");
        assert_eq!(cur.tell().unwrap(), 8);
    }

    #[test]
    fn cstring_at_restores_position() {
        let mut cur = BinaryCursor::from_vec(b"ab\0hello\0".to_vec());
        cur.seek(1).unwrap();
        assert_eq!(cur.read_cstring_at(3).unwrap(), "hello");
        assert_eq!(cur.tell().unwrap(), 1);
    }
}
