//! Serialises map records into the on-disk layout of a given version.

use tessera_records::RecordSink;

use crate::caps::MapCapabilities;
use crate::error::MapError;
use crate::names::NameTable;
use crate::records::{MapCorner, MapTile, Mountain, River};

/// Default schema version for the name table written into version 9 maps.
const DEFAULT_NAME_SCHEMA: u8 = 1;

/// Accumulates records and writes a map buffer.
///
/// Fields the target version cannot hold (volumetric light before 8, river
/// widths before 7) are left out; a missing river width is written as zero.
#[derive(Debug, Clone)]
pub struct MapBuilder {
    version: i32,
    names: Option<NameTable>,
    tiles: Vec<MapTile>,
    corners: Vec<MapCorner>,
    rivers: Vec<River>,
    mountains: Vec<Mountain>,
}

impl MapBuilder {
    pub fn new(version: i32) -> Self {
        Self {
            version,
            names: None,
            tiles: Vec::new(),
            corners: Vec::new(),
            rivers: Vec::new(),
            mountains: Vec::new(),
        }
    }

    /// Name table to embed. Only written for versions that embed one; an
    /// embedding version without a table gets an empty tagged table.
    pub fn set_names(&mut self, names: NameTable) -> &mut Self {
        self.names = Some(names);
        self
    }

    pub fn push_tile(&mut self, tile: MapTile) -> &mut Self {
        self.tiles.push(tile);
        self
    }

    pub fn push_corner(&mut self, corner: MapCorner) -> &mut Self {
        self.corners.push(corner);
        self
    }

    pub fn push_river(&mut self, river: River) -> &mut Self {
        self.rivers.push(river);
        self
    }

    pub fn push_mountain(&mut self, mountain: Mountain) -> &mut Self {
        self.mountains.push(mountain);
        self
    }

    pub fn build(&self) -> Result<Vec<u8>, MapError> {
        let caps = MapCapabilities::for_version(self.version)?;
        let mut sink = RecordSink::new();
        sink.push_i32(self.version);
        sink.push_i32(count(self.tiles.len())?);
        sink.push_i32(count(self.corners.len())?);
        sink.push_i32(count(self.rivers.len())?);
        sink.push_i32(count(self.mountains.len())?);

        if caps.embedded_names {
            let names = match &self.names {
                Some(names) => names.encode()?,
                None => NameTable::new(DEFAULT_NAME_SCHEMA).encode()?,
            };
            sink.push_bytes(&names);
        }

        for (slot, tile) in self.tiles.iter().enumerate() {
            sink.push_i32(count(slot)?);
            sink.push_f32(tile.elevation);
            sink.push_f32(tile.water_elevation);
            sink.push_f32(tile.temperature);
            sink.push_f32(tile.moisture);
            sink.push_u8(tile.terrain);
            sink.push_u8(tile.vegetation);
            sink.push_u8(tile.biome);
            sink.push_u8(tile.vegetation_data);
            sink.push_i16(tile.decoration);
            if caps.volumetric_light {
                sink.push_f32(tile.volumetric_light.unwrap_or(0.0));
            }
        }
        for (slot, corner) in self.corners.iter().enumerate() {
            sink.push_i32(count(slot)?);
            sink.push_u8(corner.cliff);
        }
        for (slot, river) in self.rivers.iter().enumerate() {
            sink.push_i32(count(slot)?);
            sink.push_i32(count(river.segments.len())?);
            for segment in &river.segments {
                sink.push_i32(segment.tile);
                if caps.river_width {
                    sink.push_u8(segment.width.unwrap_or(0));
                }
            }
        }
        for (slot, mountain) in self.mountains.iter().enumerate() {
            sink.push_i32(count(slot)?);
            sink.push_i32(count(mountain.tiles.len())?);
            for &tile in &mountain.tiles {
                sink.push_i32(tile);
            }
        }
        Ok(sink.into_bytes())
    }
}

fn count(value: usize) -> Result<i32, MapError> {
    i32::try_from(value).map_err(|_| MapError::LayoutOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HEADER_SIZE;

    #[test]
    fn test_sizes_per_version() {
        let tile = MapTile {
            elevation: 1.0,
            water_elevation: 0.0,
            temperature: 0.0,
            moisture: 0.0,
            terrain: 0,
            vegetation: 0,
            biome: 0,
            vegetation_data: 0,
            decoration: -1,
            volumetric_light: None,
        };
        let mut old = MapBuilder::new(6);
        old.push_tile(tile).push_tile(tile);
        assert_eq!(old.build().unwrap().len(), HEADER_SIZE + 2 * 26);

        let mut new = MapBuilder::new(8);
        new.push_tile(tile).push_tile(tile);
        assert_eq!(new.build().unwrap().len(), HEADER_SIZE + 2 * 30);
    }

    #[test]
    fn test_version_9_always_embeds_table() {
        let bytes = MapBuilder::new(9).build().unwrap();
        // tag, schema version, two empty counts
        assert_eq!(bytes.len(), HEADER_SIZE + 2 + 4 + 4);
    }

    #[test]
    fn test_unknown_version_rejected() {
        assert_eq!(
            MapBuilder::new(0).build(),
            Err(MapError::UnsupportedVersion(0))
        );
    }
}
