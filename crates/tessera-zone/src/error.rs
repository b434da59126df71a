//! Zone partition errors.

/// Errors raised while assigning tiles to zones.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    /// A tile index outside the partitioned range.
    #[error("tile {tile} out of range (count {count})")]
    TileOutOfRange { tile: usize, count: usize },

    /// A tile position that does not name a direction on the sphere.
    #[error("tile {tile} has no usable position")]
    TileOffSphere { tile: usize },
}
