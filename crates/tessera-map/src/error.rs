//! Map store errors.

use tessera_records::RecordError;

use crate::names::NameTableError;

/// Errors raised by the map and province stores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    /// The buffer is shorter than the header or fixed-size region requires.
    #[error("map truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum byte count implied by the header.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// The header version is outside the supported range.
    #[error("unsupported map version: {0}")]
    UnsupportedVersion(i32),

    /// A header count field is negative.
    #[error("negative {field} in map header: {value}")]
    NegativeCount {
        /// Header field name.
        field: &'static str,
        /// Value read from the header.
        value: i32,
    },

    /// The declared counts describe a buffer larger than addressable memory.
    #[error("map header counts overflow the address space")]
    LayoutOverflow,

    /// An accessor index is outside `[0, count)`.
    #[error("{kind} index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Record kind being accessed.
        kind: &'static str,
        /// Requested index.
        index: usize,
        /// Number of records of that kind.
        count: usize,
    },

    /// A length-prefixed record has a negative length or runs past the buffer.
    #[error("{kind} record {index} at offset {offset} is corrupt")]
    CorruptSequence {
        /// Record kind being walked.
        kind: &'static str,
        /// Index of the offending record.
        index: usize,
        /// Byte offset where the record starts.
        offset: usize,
    },

    /// A tile patch field is outside the range its record slot can hold.
    #[error("{field} value {value} out of range")]
    FieldOutOfRange {
        /// Patch field name.
        field: &'static str,
        /// Rejected value.
        value: i64,
    },

    /// The name table is malformed or used against the wrong map version.
    #[error(transparent)]
    Schema(#[from] NameTableError),

    /// A raw field access failed.
    #[error(transparent)]
    Record(#[from] RecordError),
}
