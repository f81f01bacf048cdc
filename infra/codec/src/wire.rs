//! Primitive encodings shared by every record.
//!
//! Integers are little-endian. Strings and collections are prefixed by an `i32` length;
//! the length `-1` marks an absent (null) value, any other negative length is corrupt.

use crate::error::{CodecError, CodecErrorExt};
use verity_domain::Uuid;

const NULL_LENGTH: i32 = -1;

/// Append-only byte sink for one record.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Most-significant word first, then least-significant.
    pub fn write_uuid(&mut self, value: Uuid) {
        let (high, low) = value.as_u64_pair();
        self.write_u64(high);
        self.write_u64(low);
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_len(value.len());
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn write_null(&mut self) {
        self.write_i32(NULL_LENGTH);
    }

    /// Writes a collection count. Counts beyond `i32::MAX` cannot be represented by the
    /// format and are clamped, which the reader then rejects as inconsistent.
    pub fn write_len(&mut self, len: usize) {
        self.write_i32(i32::try_from(len).unwrap_or(i32::MAX));
    }

    pub fn write_str_list<'a>(&mut self, values: impl ExactSizeIterator<Item = &'a str>) {
        self.write_len(values.len());
        for value in values {
            self.write_str(value);
        }
    }
}

/// Cursor over one encoded record.
#[derive(Debug)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                message: format!("needed {len} bytes for {what}, {} left", self.remaining())
                    .into(),
                context: None,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], CodecError> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, CodecError> {
        Ok(self.take_array::<1>(what)?[0])
    }

    pub fn read_i32(&mut self, what: &'static str) -> Result<i32, CodecError> {
        self.take_array(what).map(i32::from_le_bytes)
    }

    pub fn read_u64(&mut self, what: &'static str) -> Result<u64, CodecError> {
        self.take_array(what).map(u64::from_le_bytes)
    }

    pub fn read_uuid(&mut self, what: &'static str) -> Result<Uuid, CodecError> {
        let high = self.read_u64(what)?;
        let low = self.read_u64(what)?;
        Ok(Uuid::from_u64_pair(high, low))
    }

    /// Reads a length prefix; `None` for the null marker.
    ///
    /// `min_element_size` is the smallest number of bytes one element can occupy, used to
    /// reject counts the remaining input cannot possibly hold before allocating for them.
    pub fn read_len(
        &mut self,
        min_element_size: usize,
        what: &'static str,
    ) -> Result<Option<usize>, CodecError> {
        let raw = self.read_i32(what)?;
        if raw == NULL_LENGTH {
            return Ok(None);
        }
        let len = usize::try_from(raw).map_err(|_| CodecError::UnexpectedCount {
            message: format!("{what}: negative count {raw}").into(),
            context: None,
        })?;
        if len.saturating_mul(min_element_size) > self.remaining() {
            return Err(CodecError::UnexpectedCount {
                message: format!("{what}: count {len} exceeds remaining input").into(),
                context: None,
            });
        }
        Ok(Some(len))
    }

    pub fn read_opt_str(&mut self, what: &'static str) -> Result<Option<String>, CodecError> {
        let Some(len) = self.read_len(1, what)? else {
            return Ok(None);
        };
        let bytes = self.take(len, what)?.to_vec();
        String::from_utf8(bytes).context(what).map(Some)
    }

    /// Reads a string that must be present.
    pub fn read_str(&mut self, what: &'static str) -> Result<String, CodecError> {
        self.read_opt_str(what)?.ok_or_else(|| {
            verity_domain::DomainError::NullRequiredField { message: what.into(), context: None }
                .into()
        })
    }

    pub fn read_opt_str_list(
        &mut self,
        what: &'static str,
    ) -> Result<Option<Vec<String>>, CodecError> {
        let Some(len) = self.read_len(4, what)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.read_str(what)?);
        }
        Ok(Some(out))
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(CodecError::TrailingBytes {
                message: format!("{left} unread bytes").into(),
                context: None,
            }),
        }
    }
}
