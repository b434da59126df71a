//! Two-byte variable-length integer used for string lengths.
//!
//! | First byte | Encoded value |
//! |------------|---------------|
//! | `0xxxxxxx` | the byte itself (0..=127) |
//! | `1hhhhhhh` | `(h << 8) \| next_byte` (up to 32767) |
//!
//! The form never grows past two bytes. Readers of the name table rely on
//! that cap, so encoders must reject anything larger rather than spill.

use crate::RecordError;

/// Largest value representable by the two-byte form.
pub const MAX_VAR_LEN: usize = 0x7FFF;

/// Number of bytes `value` occupies once encoded.
#[inline]
#[must_use]
pub fn var_len_size(value: usize) -> usize {
    if value < 0x80 { 1 } else { 2 }
}

/// Append the encoding of `value` to `out`.
pub fn encode_var_len(value: usize, out: &mut Vec<u8>) -> Result<(), RecordError> {
    if value > MAX_VAR_LEN {
        return Err(RecordError::VarLenTooLarge(value));
    }
    if value < 0x80 {
        out.push(value as u8);
    } else {
        out.push(0x80 | (value >> 8) as u8);
        out.push((value & 0xFF) as u8);
    }
    Ok(())
}

/// Decode a value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_var_len(bytes: &[u8]) -> Result<(usize, usize), RecordError> {
    let first = *bytes.first().ok_or(RecordError::OutOfBounds {
        offset: 0,
        width: 1,
        len: bytes.len(),
    })?;
    if first & 0x80 == 0 {
        return Ok((usize::from(first), 1));
    }
    let second = *bytes.get(1).ok_or(RecordError::OutOfBounds {
        offset: 1,
        width: 1,
        len: bytes.len(),
    })?;
    Ok(((usize::from(first & 0x7F) << 8) | usize::from(second), 2))
}
