//! Sources for the three tiles around a corner.

use tessera_mesh::{MeshStore, ProgressSink, ProgressTicker, SweepStage};

use crate::error::GeodesicError;

/// Anything that can report the tiles meeting at a corner.
pub trait CornerTiles {
    fn corner_count(&self) -> usize;

    /// The three tile references of `corner`, or `None` past the end.
    fn tiles_around(&self, corner: usize) -> Option<[i32; 3]>;
}

impl CornerTiles for MeshStore {
    fn corner_count(&self) -> usize {
        self.header().corner_count
    }

    fn tiles_around(&self, corner: usize) -> Option<[i32; 3]> {
        self.corner_tiles(corner)
    }
}

/// Corner-to-tile table copied out of the mesh in one sweep.
///
/// Every entry has been checked against the mesh tile count, so lookups
/// through the cache cannot produce a dangling tile index.
#[derive(Clone, Debug, Default)]
pub struct CornerTileCache {
    tiles: Vec<[i32; 3]>,
}

impl CornerTileCache {
    /// Sweep every corner of `mesh`, reporting to `progress` every
    /// `interval` corners.
    pub fn build(
        mesh: &MeshStore,
        interval: usize,
        progress: &mut dyn ProgressSink,
    ) -> Result<Self, GeodesicError> {
        let header = mesh.header();
        let mut ticker = ProgressTicker::new(SweepStage::CornerTiles, header.corner_count, interval);
        let mut tiles = Vec::with_capacity(header.corner_count);
        for corner in 0..header.corner_count {
            let around = mesh
                .corner_tiles(corner)
                .ok_or(GeodesicError::CornerOutOfRange {
                    corner,
                    count: header.corner_count,
                })?;
            if let Some(&tile) = around
                .iter()
                .find(|&&t| usize::try_from(t).map_or(true, |t| t >= header.tile_count))
            {
                return Err(GeodesicError::InvalidCornerTile { corner, tile });
            }
            tiles.push(around);
            ticker.tick(progress);
        }
        ticker.finish(progress);
        tracing::info!(corners = tiles.len(), "corner tile cache built");
        Ok(Self { tiles })
    }

    /// Wrap an existing table without validation.
    pub fn from_table(tiles: Vec<[i32; 3]>) -> Self {
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl CornerTiles for CornerTileCache {
    fn corner_count(&self) -> usize {
        self.tiles.len()
    }

    fn tiles_around(&self, corner: usize) -> Option<[i32; 3]> {
        self.tiles.get(corner).copied()
    }
}
