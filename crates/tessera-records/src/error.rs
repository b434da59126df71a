//! Record access error types.

/// Errors raised by record reads, writes and the variable-length codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A field read or write would cross the end of the buffer.
    #[error("access of {width} bytes at offset {offset} overruns buffer of {len} bytes")]
    OutOfBounds {
        /// Byte offset of the field.
        offset: usize,
        /// Width of the field in bytes.
        width: usize,
        /// Total buffer length.
        len: usize,
    },

    /// A length does not fit the two-byte variable-length form.
    #[error("length {0} exceeds the variable-length maximum of 32767")]
    VarLenTooLarge(usize),

    /// A string contains a character outside the single-byte range.
    #[error("character {0:?} cannot be stored as a single byte")]
    NonLatin1(char),
}
