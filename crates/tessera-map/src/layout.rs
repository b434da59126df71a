//! Byte layout of the map buffer.
//!
//! ## Binary Layout
//!
//! | Section | Record size | Count |
//! |---------|-------------|-------|
//! | Header | 20 | 1 |
//! | Name table | variable | version 9 and later only |
//! | Tiles | 26 or 30 | `tile_count` |
//! | Corners | 5 | `corner_count` |
//! | Rivers | variable | `river_count` |
//! | Mountains | variable | `mountain_count` |
//!
//! Header fields are `i32 version, tile_count, corner_count, river_count,
//! mountain_count`. Every record opens with a 4-byte slot.
//!
//! Tile record from its start: slot, `f32` elevation at +4, water elevation at
//! +8, temperature at +12, moisture at +16, `u8` terrain at +20, vegetation at
//! +21, biome at +22, vegetation data at +23, `i16` decoration at +24 and, from
//! version 8, `f32` volumetric light at +26.
//!
//! Corner record: slot, `u8` cliff type at +4.

use static_assertions::const_assert_eq;

use crate::caps::{BASE_TILE_STRIDE, LIGHT_TILE_STRIDE, MapCapabilities};

pub const HEADER_SIZE: usize = 20;
pub const CORNER_RECORD_SIZE: usize = 5;

pub(crate) const ELEVATION_OFFSET: usize = 4;
pub(crate) const WATER_ELEVATION_OFFSET: usize = 8;
pub(crate) const TEMPERATURE_OFFSET: usize = 12;
pub(crate) const MOISTURE_OFFSET: usize = 16;
pub(crate) const TERRAIN_OFFSET: usize = 20;
pub(crate) const VEGETATION_OFFSET: usize = 21;
pub(crate) const BIOME_OFFSET: usize = 22;
pub(crate) const VEGETATION_DATA_OFFSET: usize = 23;
pub(crate) const DECORATION_OFFSET: usize = 24;
pub(crate) const VOLUMETRIC_LIGHT_OFFSET: usize = 26;
pub(crate) const CLIFF_OFFSET: usize = 4;

const_assert_eq!(BASE_TILE_STRIDE, DECORATION_OFFSET + 2);
const_assert_eq!(LIGHT_TILE_STRIDE, VOLUMETRIC_LIGHT_OFFSET + 4);
const_assert_eq!(CORNER_RECORD_SIZE, CLIFF_OFFSET + 1);

/// Offsets of the fixed-size sections, resolved once at open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapLayout {
    /// Bytes taken by the embedded name table, zero when absent.
    pub names_len: usize,
    pub tiles_start: usize,
    pub corners_start: usize,
    /// First river record; mountains follow the last river.
    pub sequences_start: usize,
    pub tile_stride: usize,
}

impl MapLayout {
    /// Returns `None` if the section offsets overflow.
    pub fn new(
        caps: &MapCapabilities,
        names_len: usize,
        tile_count: usize,
        corner_count: usize,
    ) -> Option<Self> {
        let tiles_start = HEADER_SIZE.checked_add(names_len)?;
        let corners_start = tile_count
            .checked_mul(caps.tile_stride)?
            .checked_add(tiles_start)?;
        let sequences_start = corner_count
            .checked_mul(CORNER_RECORD_SIZE)?
            .checked_add(corners_start)?;
        Some(Self {
            names_len,
            tiles_start,
            corners_start,
            sequences_start,
            tile_stride: caps.tile_stride,
        })
    }

    #[inline]
    pub fn tile_offset(&self, index: usize) -> usize {
        self.tiles_start + index * self.tile_stride
    }

    #[inline]
    pub fn corner_offset(&self, index: usize) -> usize {
        self.corners_start + index * CORNER_RECORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_table_shifts_every_section() {
        let caps = MapCapabilities::for_version(9).unwrap();
        let plain = MapLayout::new(&caps, 0, 10, 4).unwrap();
        let named = MapLayout::new(&caps, 37, 10, 4).unwrap();
        assert_eq!(named.tile_offset(3), plain.tile_offset(3) + 37);
        assert_eq!(named.corner_offset(2), plain.corner_offset(2) + 37);
        assert_eq!(named.sequences_start, plain.sequences_start + 37);
    }

    #[test]
    fn test_stride_follows_version() {
        let v6 = MapCapabilities::for_version(6).unwrap();
        let v8 = MapCapabilities::for_version(8).unwrap();
        let old = MapLayout::new(&v6, 0, 3, 0).unwrap();
        let new = MapLayout::new(&v8, 0, 3, 0).unwrap();
        assert_eq!(old.tile_offset(1) - old.tile_offset(0), 26);
        assert_eq!(new.tile_offset(1) - new.tile_offset(0), 30);
        assert_eq!(new.corners_start, HEADER_SIZE + 90);
    }
}
