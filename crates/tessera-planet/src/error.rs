//! Errors surfaced by a planet context.

use std::path::PathBuf;

use tessera_geodesic::GeodesicError;
use tessera_map::MapError;
use tessera_mesh::MeshError;
use tessera_zone::ZoneError;

/// Everything that can fail while opening or querying a [`PlanetContext`].
///
/// [`PlanetContext`]: crate::PlanetContext
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("map: {0}")]
    Map(#[from] MapError),

    #[error("geodesic lookup: {0}")]
    Geodesic(#[from] GeodesicError),

    #[error("zone partition: {0}")]
    Zone(#[from] ZoneError),

    /// Mesh and map disagree on the number of tiles.
    #[error("mesh has {mesh} tiles but map has {map}")]
    TileCountMismatch { mesh: usize, map: usize },

    /// Mesh and map disagree on the number of corners.
    #[error("mesh has {mesh} corners but map has {map}")]
    CornerCountMismatch { mesh: usize, map: usize },

    /// The province overlay does not cover every tile.
    #[error("province overlay has {provinces} records for {tiles} tiles")]
    ProvinceCountMismatch { tiles: usize, provinces: usize },

    #[error("tile {tile} out of range (count {count})")]
    TileOutOfRange { tile: usize, count: usize },

    #[error("corner {corner} out of range (count {count})")]
    CornerOutOfRange { corner: usize, count: usize },

    /// No province overlay has been attached.
    #[error("no province overlay attached")]
    NoProvinces,

    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
