//! Mesh decoding errors.

use tessera_records::RecordError;

/// Errors raised while opening or building a mesh buffer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The buffer is shorter than the header or the declared record counts need.
    #[error("mesh truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum byte count implied by the header.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// The header version is not one this reader understands.
    #[error("unsupported mesh version: {0}")]
    UnsupportedVersion(i32),

    /// A header count field is negative.
    #[error("negative {field} in mesh header: {value}")]
    NegativeCount {
        /// Header field name.
        field: &'static str,
        /// Value read from the header.
        value: i32,
    },

    /// The declared counts describe a buffer larger than addressable memory.
    #[error("mesh header counts overflow the address space")]
    LayoutOverflow,

    /// A tile record's edge count disagrees with its position in the tile section.
    #[error("tile {tile} stores {edge_count} edges but its slot holds {expected}")]
    IrregularTileShape {
        /// Tile index.
        tile: usize,
        /// Edge count stored in the record.
        edge_count: i32,
        /// Edge count implied by the tile index.
        expected: usize,
    },

    /// A raw field access failed.
    #[error(transparent)]
    Record(#[from] RecordError),
}
