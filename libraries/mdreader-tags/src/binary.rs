//! Bounds-checked byte access shared by the extractors
//!
//! A [`ByteCursor`] walks an in-memory slice and a [`Source`] fetches byte
//! ranges from a seekable reader. Both report overruns through the error
//! constructor of the format being parsed, so a truncated FLAC block
//! surfaces as `MalformedFlac` and a truncated ID3 frame as `MalformedId3`.

use crate::error::{Result, TagReadError};
use std::io::{Read, Seek, SeekFrom};

/// Builds the format-specific error for a structural problem
pub(crate) type Fail = fn(String) -> TagReadError;

pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    fail: Fail,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8], fail: Fail) -> Self {
        Self { data, pos: 0, fail }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> TagReadError {
        (self.fail)(message.into())
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.error(format!(
                "need {} bytes at offset {}, only {} left",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Everything not yet consumed
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn u16_be(&mut self) -> Result<u16> {
        self.array().map(u16::from_be_bytes)
    }

    pub(crate) fn u16_le(&mut self) -> Result<u16> {
        self.array().map(u16::from_le_bytes)
    }

    pub(crate) fn u24_be(&mut self) -> Result<u32> {
        let [a, b, c] = self.array()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub(crate) fn u24_le(&mut self) -> Result<u32> {
        let [a, b, c] = self.array()?;
        Ok(u32::from_le_bytes([a, b, c, 0]))
    }

    pub(crate) fn u32_be(&mut self) -> Result<u32> {
        self.array().map(u32::from_be_bytes)
    }

    pub(crate) fn u32_le(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    pub(crate) fn u64_be(&mut self) -> Result<u64> {
        self.array().map(u64::from_be_bytes)
    }

    pub(crate) fn u64_le(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    /// Length-prefixed slice, checked against what is left
    pub(crate) fn take_u32(&mut self, len: u32) -> Result<&'a [u8]> {
        let len = usize::try_from(len).map_err(|_| self.error("length does not fit in memory"))?;
        self.take(len)
    }
}

/// A seekable input with a known length
pub(crate) struct Source<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> Source<R> {
    pub(crate) fn new(mut inner: R) -> std::io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    /// Read exactly `len` bytes at `offset`; a range past the end is a
    /// structural error of the format being read
    pub(crate) fn read_at(&mut self, offset: u64, len: u64, fail: Fail) -> Result<Vec<u8>> {
        let end = offset.checked_add(len).filter(|end| *end <= self.len);
        if end.is_none() {
            return Err(fail(format!(
                "range {}+{} exceeds file length {}",
                offset, len, self.len
            )));
        }
        let len = usize::try_from(len).map_err(|_| fail("range does not fit in memory".into()))?;
        let mut buf = vec![0u8; len];
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read up to `max` bytes at `offset`, clipped at end of file
    pub(crate) fn read_up_to(&mut self, offset: u64, max: u64) -> Result<Vec<u8>> {
        if offset >= self.len {
            return Ok(Vec::new());
        }
        let len = max.min(self.len - offset);
        self.read_at(offset, len, TagReadError::UnsupportedFormat)
    }
}

/// Decode a 28-bit syncsafe integer (7 significant bits per byte)
pub(crate) fn syncsafe(bytes: [u8; 4]) -> Option<u32> {
    if bytes.iter().any(|b| b & 0x80 != 0) {
        return None;
    }
    Some(bytes.iter().fold(0u32, |acc, b| (acc << 7) | u32::from(*b)))
}
