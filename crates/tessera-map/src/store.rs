//! Versioned per-tile map state with in-place edits.

use tessera_records::{RecordReader, RecordWriter};

use crate::caps::MapCapabilities;
use crate::error::MapError;
use crate::layout::{
    BIOME_OFFSET, CLIFF_OFFSET, DECORATION_OFFSET, ELEVATION_OFFSET, HEADER_SIZE, MOISTURE_OFFSET,
    MapLayout, TEMPERATURE_OFFSET, TERRAIN_OFFSET, VEGETATION_DATA_OFFSET, VEGETATION_OFFSET,
    VOLUMETRIC_LIGHT_OFFSET, WATER_ELEVATION_OFFSET,
};
use crate::names::{NameTable, NameTableError};
use crate::records::{MapCorner, MapHeader, MapTile, Mountain, River, TilePatch};
use crate::sequence::{MountainIter, RiverIter};

/// Owns a map buffer.
///
/// The version capabilities and section offsets are resolved once by
/// [`MapStore::open`]. Tile and corner records sit at fixed offsets; rivers and
/// mountains are length-prefixed and only reachable by walking from the first.
#[derive(Debug)]
pub struct MapStore {
    bytes: Vec<u8>,
    header: MapHeader,
    caps: MapCapabilities,
    layout: MapLayout,
    names: Option<NameTable>,
    modified: bool,
}

impl MapStore {
    /// Validate the header, decode the embedded name table if the version has
    /// one, and take ownership of `bytes`.
    pub fn open(bytes: Vec<u8>) -> Result<Self, MapError> {
        if bytes.len() < HEADER_SIZE {
            return Err(MapError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let reader = RecordReader::new(&bytes);
        let caps = MapCapabilities::for_version(reader.i32_at(0)?)?;
        let header = MapHeader {
            version: caps.version,
            tile_count: count_field(&reader, 4, "tile count")?,
            corner_count: count_field(&reader, 8, "corner count")?,
            river_count: count_field(&reader, 12, "river count")?,
            mountain_count: count_field(&reader, 16, "mountain count")?,
        };

        let (names, names_len) = if caps.embedded_names {
            let (table, len) = NameTable::decode_at(&bytes, HEADER_SIZE)?;
            (Some(table), len)
        } else {
            (None, 0)
        };

        let layout = MapLayout::new(&caps, names_len, header.tile_count, header.corner_count)
            .ok_or(MapError::LayoutOverflow)?;
        if bytes.len() < layout.sequences_start {
            return Err(MapError::Truncated {
                expected: layout.sequences_start,
                actual: bytes.len(),
            });
        }

        tracing::info!(
            version = caps.version,
            tiles = header.tile_count,
            corners = header.corner_count,
            rivers = header.river_count,
            mountains = header.mountain_count,
            tile_stride = caps.tile_stride,
            names_len,
            "map opened"
        );
        Ok(Self {
            bytes,
            header,
            caps,
            layout,
            names,
            modified: false,
        })
    }

    /// Decode a separately shipped name table for a map older than version 9.
    pub fn attach_names(&mut self, bytes: &[u8]) -> Result<&NameTable, MapError> {
        if self.caps.embedded_names {
            return Err(NameTableError::ExternalTableForEmbeddedVersion(self.caps.version).into());
        }
        let (table, _) = NameTable::decode(bytes)?;
        Ok(self.names.insert(table))
    }

    pub fn header(&self) -> MapHeader {
        self.header
    }

    pub fn capabilities(&self) -> &MapCapabilities {
        &self.caps
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    /// Embedded or attached name table.
    pub fn names(&self) -> Option<&NameTable> {
        self.names.as_ref()
    }

    /// Returns true once any write has gone through since the last
    /// [`clear_modified`](Self::clear_modified).
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Release the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn reader(&self) -> RecordReader<'_> {
        RecordReader::new(&self.bytes)
    }

    fn check_index(&self, kind: &'static str, index: usize, count: usize) -> Result<(), MapError> {
        if index < count {
            Ok(())
        } else {
            Err(MapError::IndexOutOfRange { kind, index, count })
        }
    }

    pub fn tile(&self, index: usize) -> Result<MapTile, MapError> {
        self.check_index("tile", index, self.header.tile_count)?;
        let base = self.layout.tile_offset(index);
        let r = self.reader();
        Ok(MapTile {
            elevation: r.f32_at(base + ELEVATION_OFFSET)?,
            water_elevation: r.f32_at(base + WATER_ELEVATION_OFFSET)?,
            temperature: r.f32_at(base + TEMPERATURE_OFFSET)?,
            moisture: r.f32_at(base + MOISTURE_OFFSET)?,
            terrain: r.u8_at(base + TERRAIN_OFFSET)?,
            vegetation: r.u8_at(base + VEGETATION_OFFSET)?,
            biome: r.u8_at(base + BIOME_OFFSET)?,
            vegetation_data: r.u8_at(base + VEGETATION_DATA_OFFSET)?,
            decoration: r.i16_at(base + DECORATION_OFFSET)?,
            volumetric_light: if self.caps.volumetric_light {
                Some(r.f32_at(base + VOLUMETRIC_LIGHT_OFFSET)?)
            } else {
                None
            },
        })
    }

    pub fn all_tiles(&self) -> Result<Vec<MapTile>, MapError> {
        (0..self.header.tile_count).map(|i| self.tile(i)).collect()
    }

    /// Overwrite the fields `patch` supplies.
    ///
    /// Every supplied field is range-checked before any byte is written, so a
    /// rejected patch leaves the tile untouched. The buffer length never
    /// changes. A volumetric light value on a map without that field is
    /// dropped silently.
    pub fn set_tile(&mut self, index: usize, patch: &TilePatch) -> Result<(), MapError> {
        self.check_index("tile", index, self.header.tile_count)?;
        let terrain = patch
            .terrain
            .map(|v| u8::try_from(v).map_err(|_| out_of_range("terrain", v)))
            .transpose()?;
        let decoration = patch
            .decoration
            .map(|v| match i16::try_from(v) {
                Ok(d) if d >= -1 => Ok(d),
                _ => Err(out_of_range("decoration", v)),
            })
            .transpose()?;
        let volumetric_light = match patch.volumetric_light {
            Some(_) if !self.caps.volumetric_light => {
                tracing::debug!(
                    version = self.caps.version,
                    tile = index,
                    "volumetric light ignored for this map version"
                );
                None
            }
            other => other,
        };

        let base = self.layout.tile_offset(index);
        let mut w = RecordWriter::new(&mut self.bytes);
        let floats = [
            (patch.elevation, ELEVATION_OFFSET),
            (patch.water_elevation, WATER_ELEVATION_OFFSET),
            (patch.temperature, TEMPERATURE_OFFSET),
            (patch.moisture, MOISTURE_OFFSET),
            (volumetric_light, VOLUMETRIC_LIGHT_OFFSET),
        ];
        for (value, offset) in floats {
            if let Some(v) = value {
                w.put_f32(base + offset, v)?;
            }
        }
        let bytes = [
            (terrain, TERRAIN_OFFSET),
            (patch.vegetation, VEGETATION_OFFSET),
            (patch.biome, BIOME_OFFSET),
            (patch.vegetation_data, VEGETATION_DATA_OFFSET),
        ];
        for (value, offset) in bytes {
            if let Some(v) = value {
                w.put_u8(base + offset, v)?;
            }
        }
        if let Some(d) = decoration {
            w.put_i16(base + DECORATION_OFFSET, d)?;
        }
        self.modified = true;
        Ok(())
    }

    pub fn corner(&self, index: usize) -> Result<MapCorner, MapError> {
        self.check_index("corner", index, self.header.corner_count)?;
        let cliff = self
            .reader()
            .u8_at(self.layout.corner_offset(index) + CLIFF_OFFSET)?;
        Ok(MapCorner { cliff })
    }

    pub fn all_corners(&self) -> Result<Vec<MapCorner>, MapError> {
        (0..self.header.corner_count)
            .map(|i| self.corner(i))
            .collect()
    }

    /// Lazy single-pass walk over every river.
    pub fn rivers(&self) -> RiverIter<'_> {
        RiverIter::new(
            &self.bytes,
            self.layout.sequences_start,
            self.header.river_count,
            self.caps.river_segment_size,
            self.caps.river_width,
        )
    }

    /// Lazy single-pass walk over every mountain range.
    ///
    /// Fails up front if a river record is corrupt, since the mountain
    /// section starts where the last river ends.
    pub fn mountains(&self) -> Result<MountainIter<'_>, MapError> {
        let start = self.rivers().end_offset()?;
        Ok(MountainIter::new(
            &self.bytes,
            start,
            self.header.mountain_count,
        ))
    }

    /// River `index`. Walks every earlier river record.
    pub fn river(&self, index: usize) -> Result<River, MapError> {
        self.check_index("river", index, self.header.river_count)?;
        let mut iter = self.rivers();
        iter.advance(index)?;
        iter.next().unwrap_or(Err(MapError::IndexOutOfRange {
            kind: "river",
            index,
            count: self.header.river_count,
        }))
    }

    /// Mountain range `index`. Walks every river and every earlier range.
    pub fn mountain(&self, index: usize) -> Result<Mountain, MapError> {
        self.check_index("mountain", index, self.header.mountain_count)?;
        let mut iter = self.mountains()?;
        iter.advance(index)?;
        iter.next().unwrap_or(Err(MapError::IndexOutOfRange {
            kind: "mountain",
            index,
            count: self.header.mountain_count,
        }))
    }

    pub fn all_rivers(&self) -> Result<Vec<River>, MapError> {
        self.rivers().collect()
    }

    pub fn all_mountains(&self) -> Result<Vec<Mountain>, MapError> {
        self.mountains()?.collect()
    }
}

fn count_field(
    reader: &RecordReader<'_>,
    offset: usize,
    field: &'static str,
) -> Result<usize, MapError> {
    let value = reader.i32_at(offset)?;
    usize::try_from(value).map_err(|_| MapError::NegativeCount { field, value })
}

fn out_of_range(field: &'static str, value: i32) -> MapError {
    MapError::FieldOutOfRange {
        field,
        value: i64::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MapBuilder;
    use crate::names::{ModelName, NameSchema, TreeName};
    use crate::records::RiverSegment;

    fn tile(seed: f32) -> MapTile {
        MapTile {
            elevation: seed,
            water_elevation: seed * 0.5,
            temperature: -seed,
            moisture: 0.25,
            terrain: 3,
            vegetation: 4,
            biome: 5,
            vegetation_data: 6,
            decoration: -1,
            volumetric_light: Some(0.0),
        }
    }

    fn sample(version: i32) -> MapStore {
        let mut builder = MapBuilder::new(version);
        for i in 0..4 {
            builder.push_tile(tile(i as f32));
        }
        builder.push_corner(MapCorner { cliff: 2 });
        builder.push_corner(MapCorner { cliff: 9 });
        builder.push_river(River {
            segments: vec![
                RiverSegment {
                    tile: 1,
                    width: Some(4),
                },
                RiverSegment {
                    tile: 2,
                    width: Some(5),
                },
            ],
        });
        builder.push_river(River {
            segments: vec![RiverSegment {
                tile: 3,
                width: Some(1),
            }],
        });
        builder.push_mountain(Mountain {
            tiles: vec![0, 1, 2],
        });
        builder.push_mountain(Mountain { tiles: vec![3] });
        MapStore::open(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_version_8_volumetric_light_roundtrip() {
        let mut store = sample(8);
        assert_eq!(store.capabilities().tile_stride, 30);
        store
            .set_tile(2, &TilePatch::default().volumetric_light(0.5))
            .unwrap();
        assert_eq!(store.tile(2).unwrap().volumetric_light, Some(0.5));
        assert!(store.is_modified());
    }

    #[test]
    fn test_version_6_ignores_volumetric_light() {
        let mut store = sample(6);
        assert_eq!(store.capabilities().tile_stride, 26);
        let before = store.as_bytes().to_vec();
        store
            .set_tile(2, &TilePatch::default().volumetric_light(0.5))
            .unwrap();
        assert_eq!(store.as_bytes(), &before[..]);
        assert_eq!(store.tile(2).unwrap().volumetric_light, None);
    }

    #[test]
    fn test_patch_writes_only_supplied_fields() {
        let mut store = sample(7);
        let patch = TilePatch::default().elevation(12.5).decoration(40);
        store.set_tile(1, &patch).unwrap();
        let updated = store.tile(1).unwrap();
        assert_eq!(updated.elevation, 12.5);
        assert_eq!(updated.decoration, 40);
        assert_eq!(updated.water_elevation, 0.5);
        assert_eq!(updated.terrain, 3);
        assert_eq!(store.tile(0).unwrap(), MapTile { volumetric_light: None, ..tile(0.0) });
    }

    #[test]
    fn test_invalid_patch_writes_nothing() {
        let mut store = sample(8);
        let before = store.as_bytes().to_vec();
        let patch = TilePatch::default().elevation(99.0).terrain(256);
        assert_eq!(
            store.set_tile(0, &patch),
            Err(MapError::FieldOutOfRange {
                field: "terrain",
                value: 256
            })
        );
        let patch = TilePatch::default().elevation(99.0).decoration(-2);
        assert!(matches!(
            store.set_tile(0, &patch),
            Err(MapError::FieldOutOfRange {
                field: "decoration",
                ..
            })
        ));
        assert_eq!(store.as_bytes(), &before[..]);
        assert!(!store.is_modified());
    }

    #[test]
    fn test_decoration_accepts_minus_one() {
        let mut store = sample(8);
        store.set_tile(3, &TilePatch::default().decoration(7)).unwrap();
        store.set_tile(3, &TilePatch::default().decoration(-1)).unwrap();
        assert_eq!(store.tile(3).unwrap().decoration, -1);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut store = sample(8);
        assert_eq!(
            store.tile(4),
            Err(MapError::IndexOutOfRange {
                kind: "tile",
                index: 4,
                count: 4
            })
        );
        assert!(store.set_tile(4, &TilePatch::default()).is_err());
        assert!(store.corner(2).is_err());
        assert!(store.river(2).is_err());
        assert!(store.mountain(2).is_err());
    }

    #[test]
    fn test_corners_and_sequences() {
        let store = sample(7);
        assert_eq!(store.corner(1).unwrap().cliff, 9);
        assert_eq!(store.all_corners().unwrap().len(), 2);
        let second = store.river(1).unwrap();
        assert_eq!(second.segments[0].width, Some(1));
        assert_eq!(store.all_rivers().unwrap().len(), 2);
        assert_eq!(store.mountain(0).unwrap().tiles, vec![0, 1, 2]);
        assert_eq!(store.mountain(1).unwrap().tiles, vec![3]);
    }

    #[test]
    fn test_old_rivers_have_no_width() {
        let store = sample(6);
        let rivers = store.all_rivers().unwrap();
        assert_eq!(rivers[0].tiles().collect::<Vec<_>>(), vec![1, 2]);
        assert!(rivers[0].segments.iter().all(|s| s.width.is_none()));
        assert_eq!(store.all_mountains().unwrap().len(), 2);
    }

    #[test]
    fn test_embedded_names_shift_tiles() {
        let mut names = NameTable::new(1);
        names.trees.push(TreeName {
            id: 4,
            name: "oak".into(),
        });
        names.models.push(ModelName {
            id: 512,
            name: "lighthouse".into(),
        });
        let mut builder = MapBuilder::new(9);
        builder.set_names(names.clone());
        builder.push_tile(tile(3.0));
        let store = MapStore::open(builder.build().unwrap()).unwrap();
        assert_eq!(store.names(), Some(&names));
        assert!(store.layout().names_len > 0);
        assert_eq!(store.tile(0).unwrap().elevation, 3.0);
        assert_eq!(store.names().unwrap().tree_name(4), Some("oak"));
    }

    #[test]
    fn test_attach_names_only_for_old_versions() {
        let legacy = NameTable {
            schema: NameSchema::Legacy,
            trees: vec![TreeName {
                id: 1,
                name: "fir".into(),
            }],
            models: Vec::new(),
        };
        let encoded = legacy.encode().unwrap();

        let mut old = sample(7);
        assert_eq!(old.attach_names(&encoded).unwrap(), &legacy);

        let mut new = sample(9);
        assert_eq!(
            new.attach_names(&encoded),
            Err(MapError::Schema(
                NameTableError::ExternalTableForEmbeddedVersion(9)
            ))
        );
    }

    #[test]
    fn test_corrupt_river_surfaces_error() {
        let store = sample(7);
        let mut bytes = store.into_bytes();
        let at = MapLayout::new(&MapCapabilities::for_version(7).unwrap(), 0, 4, 2)
            .unwrap()
            .sequences_start;
        bytes[at + 4..at + 8].copy_from_slice(&1000i32.to_le_bytes());
        let store = MapStore::open(bytes).unwrap();
        assert!(matches!(
            store.all_rivers(),
            Err(MapError::CorruptSequence {
                kind: "river",
                index: 0,
                ..
            })
        ));
        assert!(store.mountains().is_err());
    }

    #[test]
    fn test_truncated_fixed_region() {
        let mut bytes = sample(8).into_bytes();
        let cut = HEADER_SIZE + 2 * 30;
        bytes.truncate(cut);
        assert!(matches!(
            MapStore::open(bytes),
            Err(MapError::Truncated { actual, .. }) if actual == cut
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = sample(8).into_bytes();
        bytes[0..4].copy_from_slice(&12i32.to_le_bytes());
        assert_eq!(
            MapStore::open(bytes).unwrap_err(),
            MapError::UnsupportedVersion(12)
        );
    }
}
