//! In-place field writes and an appending sink for building buffers.

use crate::{RecordError, encode_var_len};

/// Overwrites fixed-width fields inside an existing buffer.
///
/// Writes never change the buffer length, so offsets computed before a
/// write stay valid after it.
#[derive(Debug)]
pub struct RecordWriter<'a> {
    bytes: &'a mut [u8],
}

impl<'a> RecordWriter<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    fn put<const N: usize>(&mut self, offset: usize, value: [u8; N]) -> Result<(), RecordError> {
        let len = self.bytes.len();
        let slot = offset
            .checked_add(N)
            .and_then(|end| self.bytes.get_mut(offset..end))
            .ok_or(RecordError::OutOfBounds {
                offset,
                width: N,
                len,
            })?;
        slot.copy_from_slice(&value);
        Ok(())
    }

    pub fn put_u8(&mut self, offset: usize, value: u8) -> Result<(), RecordError> {
        self.put(offset, [value])
    }

    pub fn put_i16(&mut self, offset: usize, value: i16) -> Result<(), RecordError> {
        self.put(offset, value.to_le_bytes())
    }

    pub fn put_i32(&mut self, offset: usize, value: i32) -> Result<(), RecordError> {
        self.put(offset, value.to_le_bytes())
    }

    pub fn put_f32(&mut self, offset: usize, value: f32) -> Result<(), RecordError> {
        self.put(offset, value.to_le_bytes())
    }
}

/// Growable little-endian output buffer used when serializing whole files.
#[derive(Debug, Default, Clone)]
pub struct RecordSink {
    buf: Vec<u8>,
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn push_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append an already encoded block.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a var-len prefixed single-byte string.
    pub fn push_string(&mut self, value: &str) -> Result<(), RecordError> {
        let mut encoded = Vec::with_capacity(value.len());
        for ch in value.chars() {
            let byte = u8::try_from(u32::from(ch)).map_err(|_| RecordError::NonLatin1(ch))?;
            encoded.push(byte);
        }
        encode_var_len(encoded.len(), &mut self.buf)?;
        self.buf.extend_from_slice(&encoded);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
