//! Bounds-checked little-endian reads at explicit offsets.

use crate::{RecordError, decode_var_len};

/// Read-only view over a record buffer.
///
/// Every read names its byte offset explicitly; nothing is cached between
/// calls, so a reader can be re-created freely over a borrowed slice.
#[derive(Clone, Copy, Debug)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordReader<'a> {
    /// Wrap a byte slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Total buffer length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The underlying slice.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn field<const N: usize>(&self, offset: usize) -> Result<[u8; N], RecordError> {
        let out_of_bounds = RecordError::OutOfBounds {
            offset,
            width: N,
            len: self.bytes.len(),
        };
        let end = offset.checked_add(N).ok_or(out_of_bounds.clone())?;
        let slice = self.bytes.get(offset..end).ok_or(out_of_bounds.clone())?;
        <[u8; N]>::try_from(slice).map_err(|_| out_of_bounds)
    }

    /// Read a `u8`.
    pub fn u8_at(&self, offset: usize) -> Result<u8, RecordError> {
        Ok(self.field::<1>(offset)?[0])
    }

    /// Read a little-endian `i16`.
    pub fn i16_at(&self, offset: usize) -> Result<i16, RecordError> {
        self.field(offset).map(i16::from_le_bytes)
    }

    /// Read a little-endian `i32`.
    pub fn i32_at(&self, offset: usize) -> Result<i32, RecordError> {
        self.field(offset).map(i32::from_le_bytes)
    }

    /// Read a little-endian `u32`.
    pub fn u32_at(&self, offset: usize) -> Result<u32, RecordError> {
        self.field(offset).map(u32::from_le_bytes)
    }

    /// Read a little-endian `f32`.
    pub fn f32_at(&self, offset: usize) -> Result<f32, RecordError> {
        self.field(offset).map(f32::from_le_bytes)
    }

    /// Read a variable-length integer. Returns `(value, bytes_consumed)`.
    pub fn var_len_at(&self, offset: usize) -> Result<(usize, usize), RecordError> {
        let tail = self.bytes.get(offset..).ok_or(RecordError::OutOfBounds {
            offset,
            width: 1,
            len: self.bytes.len(),
        })?;
        decode_var_len(tail).map_err(|err| match err {
            RecordError::OutOfBounds { offset: inner, width, .. } => RecordError::OutOfBounds {
                offset: offset + inner,
                width,
                len: self.bytes.len(),
            },
            other => other,
        })
    }

    /// Read `len` bytes as a single-byte-per-character string.
    pub fn latin1_at(&self, offset: usize, len: usize) -> Result<String, RecordError> {
        let out_of_bounds = RecordError::OutOfBounds {
            offset,
            width: len,
            len: self.bytes.len(),
        };
        let end = offset.checked_add(len).ok_or(out_of_bounds.clone())?;
        let slice = self.bytes.get(offset..end).ok_or(out_of_bounds)?;
        Ok(slice.iter().copied().map(char::from).collect())
    }
}

/// Forward-only cursor for blocks whose layout depends on earlier fields.
#[derive(Clone, Debug)]
pub struct RecordCursor<'a> {
    reader: RecordReader<'a>,
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    /// Start reading `bytes` at `pos`.
    pub fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self {
            reader: RecordReader::new(bytes),
            pos,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.reader.len().saturating_sub(self.pos)
    }

    /// Advance without reading. Fails if the skip would leave the buffer.
    pub fn skip(&mut self, count: usize) -> Result<(), RecordError> {
        if count > self.remaining() {
            return Err(RecordError::OutOfBounds {
                offset: self.pos,
                width: count,
                len: self.reader.len(),
            });
        }
        self.pos += count;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, RecordError> {
        let value = self.reader.u8_at(self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> Result<i16, RecordError> {
        let value = self.reader.i16_at(self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32, RecordError> {
        let value = self.reader.i32_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, RecordError> {
        let value = self.reader.u32_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_f32(&mut self) -> Result<f32, RecordError> {
        let value = self.reader.f32_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_var_len(&mut self) -> Result<usize, RecordError> {
        let (value, used) = self.reader.var_len_at(self.pos)?;
        self.pos += used;
        Ok(value)
    }

    /// Read a var-len prefixed single-byte string.
    pub fn read_string(&mut self) -> Result<String, RecordError> {
        let len = self.read_var_len()?;
        let value = self.reader.latin1_at(self.pos, len)?;
        self.pos += len;
        Ok(value)
    }
}
