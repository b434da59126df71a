//! Geodesic lookup errors.

/// Errors raised by the geodesic index.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeodesicError {
    /// No icosahedron face accepted the direction. Unreachable for finite
    /// input on the unit sphere; treat as a defect.
    #[error("no icosahedron face intersects direction ({x}, {y}, {z})")]
    NoIntersectingFace {
        /// Direction x component.
        x: f64,
        /// Direction y component.
        y: f64,
        /// Direction z component.
        z: f64,
    },

    /// The corner count is not 20 times a perfect square.
    #[error("corner count {0} does not describe a subdivided icosahedron")]
    IrregularCornerCount(usize),

    /// A computed corner index is past the end of the corner table.
    #[error("corner {corner} out of range (count {count})")]
    CornerOutOfRange {
        /// Computed corner index.
        corner: usize,
        /// Number of corners.
        count: usize,
    },

    /// A corner references a tile that does not exist.
    #[error("corner {corner} references invalid tile {tile}")]
    InvalidCornerTile {
        /// Corner index.
        corner: usize,
        /// Stored tile reference.
        tile: i32,
    },
}
