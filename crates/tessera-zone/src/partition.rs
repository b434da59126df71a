//! Tile to zone assignment.
//!
//! Computed once in a single sweep over the mesh tiles. The assignment is
//! never updated afterwards; a reload rebuilds it from the same positions and
//! yields the same result.

use glam::Vec3;
use rustc_hash::FxHashMap;
use tessera_mesh::{MeshStore, ProgressSink, ProgressTicker, SweepStage};

use crate::error::ZoneError;
use crate::geo::mesh_to_render;
use crate::zone::{GisZone, ZoneKey};

/// Zone of every tile and the tiles of every zone cell.
#[derive(Clone, Debug, Default)]
pub struct ZonePartition {
    tile_zones: Vec<GisZone>,
    cells: FxHashMap<GisZone, Vec<usize>>,
}

impl ZonePartition {
    /// Assign every tile of `mesh`, reporting every `interval` tiles.
    pub fn build(
        mesh: &MeshStore,
        interval: usize,
        progress: &mut dyn ProgressSink,
    ) -> Result<Self, ZoneError> {
        let count = mesh.header().tile_count;
        Self::from_positions(count, |tile| mesh.tile_position(tile), interval, progress)
    }

    /// Assign `count` tiles whose stored mesh positions come from `position`.
    pub fn from_positions<F>(
        count: usize,
        position: F,
        interval: usize,
        progress: &mut dyn ProgressSink,
    ) -> Result<Self, ZoneError>
    where
        F: Fn(usize) -> Option<Vec3>,
    {
        let mut ticker = ProgressTicker::new(SweepStage::ZoneAssignment, count, interval);
        let mut tile_zones = Vec::with_capacity(count);
        let mut cells: FxHashMap<GisZone, Vec<usize>> = FxHashMap::default();
        for tile in 0..count {
            let zone = position(tile)
                .map(mesh_to_render)
                .and_then(|p| GisZone::from_point(p.as_dvec3()))
                .ok_or(ZoneError::TileOffSphere { tile })?;
            tile_zones.push(zone);
            cells.entry(zone).or_default().push(tile);
            ticker.tick(progress);
        }
        ticker.finish(progress);
        tracing::info!(tiles = count, cells = cells.len(), "zone partition built");
        Ok(Self { tile_zones, cells })
    }

    pub fn tile_count(&self) -> usize {
        self.tile_zones.len()
    }

    /// Cell a tile was assigned to.
    pub fn zone_of(&self, tile: usize) -> Result<GisZone, ZoneError> {
        self.tile_zones
            .get(tile)
            .copied()
            .ok_or(ZoneError::TileOutOfRange {
                tile,
                count: self.tile_zones.len(),
            })
    }

    pub fn key_of(&self, tile: usize) -> Result<ZoneKey, ZoneError> {
        self.zone_of(tile).map(|z| z.key())
    }

    /// Tiles in one cell, in index order.
    pub fn tiles_in_cell(&self, zone: &GisZone) -> &[usize] {
        self.cells.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tiles under a zone key. A polar key yields the tiles of each of its
    /// cells in longitude band order.
    pub fn tiles_in_zone(&self, key: ZoneKey) -> impl Iterator<Item = usize> + '_ {
        key.cells()
            .flat_map(move |cell| self.tiles_in_cell(&cell).iter().copied())
    }

    /// Keys holding at least one tile, sorted.
    pub fn occupied_keys(&self) -> Vec<ZoneKey> {
        let mut keys: Vec<ZoneKey> = self.cells.keys().map(GisZone::key).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoCoord, geo_to_point};
    use tessera_mesh::{NoProgress, SweepProgress};

    fn stored(lat: f64, lon: f64) -> Vec3 {
        let p = geo_to_point(GeoCoord::new(lat, lon), 1000.0).as_vec3();
        Vec3::new(p.x, p.y, -p.z)
    }

    fn sample() -> Vec<Vec3> {
        vec![
            stored(5.0, 5.0),
            stored(5.0, 7.0),
            stored(-85.0, 100.0),
            stored(-88.0, -100.0),
            stored(45.0, -170.0),
        ]
    }

    #[test]
    fn test_assignment() {
        let positions = sample();
        let partition =
            ZonePartition::from_positions(positions.len(), |i| positions.get(i).copied(), 10, &mut NoProgress)
                .unwrap();
        assert_eq!(partition.zone_of(0).unwrap(), GisZone::new(7, 1).unwrap());
        assert_eq!(partition.tiles_in_cell(&GisZone::new(7, 1).unwrap()), &[0, 1]);
        assert_eq!(partition.key_of(2).unwrap(), ZoneKey::SouthPole);
        assert_eq!(partition.key_of(3).unwrap(), ZoneKey::SouthPole);
        assert_eq!(partition.zone_of(4).unwrap(), GisZone::new(9, 13).unwrap());
        assert_eq!(
            partition.zone_of(5),
            Err(ZoneError::TileOutOfRange { tile: 5, count: 5 })
        );
    }

    #[test]
    fn test_polar_key_collects_all_cells() {
        let positions = sample();
        let partition =
            ZonePartition::from_positions(positions.len(), |i| positions.get(i).copied(), 10, &mut NoProgress)
                .unwrap();
        let mut south: Vec<usize> = partition.tiles_in_zone(ZoneKey::SouthPole).collect();
        south.sort_unstable();
        assert_eq!(south, vec![2, 3]);
        assert_eq!(partition.tiles_in_zone(ZoneKey::NorthPole).count(), 0);
        assert_eq!(partition.occupied_keys().len(), 3);
    }

    #[test]
    fn test_zero_position_rejected() {
        let result = ZonePartition::from_positions(
            2,
            |i| Some(if i == 1 { Vec3::ZERO } else { Vec3::X }),
            10,
            &mut NoProgress,
        );
        assert_eq!(result.unwrap_err(), ZoneError::TileOffSphere { tile: 1 });
    }

    #[test]
    fn test_progress_checkpoints() {
        let mut seen = Vec::new();
        let mut sink = |p: SweepProgress| seen.push((p.stage, p.processed));
        ZonePartition::from_positions(5, |_| Some(Vec3::X), 2, &mut sink).unwrap();
        assert_eq!(
            seen,
            vec![
                (SweepStage::ZoneAssignment, 2),
                (SweepStage::ZoneAssignment, 4),
                (SweepStage::ZoneAssignment, 5)
            ]
        );
    }
}
