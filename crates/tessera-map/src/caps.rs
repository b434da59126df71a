//! Version capability table.
//!
//! | Version | Tile stride | River segment | Volumetric light | Embedded names |
//! |---------|-------------|---------------|------------------|----------------|
//! | 1..=6 | 26 | 4 (tile) | no | no |
//! | 7 | 26 | 5 (tile + width) | no | no |
//! | 8 | 30 | 5 | yes | no |
//! | 9 | 30 | 5 | yes | yes |
//!
//! The table is consulted once when a store opens; accessors read the
//! resolved strides and flags instead of comparing version numbers.

use crate::error::MapError;

/// Oldest map version this crate reads.
pub const MIN_MAP_VERSION: i32 = 1;
/// Newest map version this crate reads.
pub const MAX_MAP_VERSION: i32 = 9;

pub(crate) const BASE_TILE_STRIDE: usize = 26;
pub(crate) const LIGHT_TILE_STRIDE: usize = 30;
pub(crate) const RIVER_TILE_SIZE: usize = 4;
pub(crate) const RIVER_WIDTH_SIZE: usize = 1;

/// Field presence and strides resolved from a map version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapCapabilities {
    pub version: i32,
    /// Bytes per tile record.
    pub tile_stride: usize,
    /// Bytes per river segment.
    pub river_segment_size: usize,
    /// River segments carry a `u8` width after the tile index.
    pub river_width: bool,
    /// Tile records carry a trailing `f32` volumetric light intensity.
    pub volumetric_light: bool,
    /// The name table sits between the header and the tile records.
    pub embedded_names: bool,
}

impl MapCapabilities {
    pub fn for_version(version: i32) -> Result<Self, MapError> {
        if !(MIN_MAP_VERSION..=MAX_MAP_VERSION).contains(&version) {
            return Err(MapError::UnsupportedVersion(version));
        }
        let river_width = version >= 7;
        let volumetric_light = version >= 8;
        Ok(Self {
            version,
            tile_stride: if volumetric_light {
                LIGHT_TILE_STRIDE
            } else {
                BASE_TILE_STRIDE
            },
            river_segment_size: if river_width {
                RIVER_TILE_SIZE + RIVER_WIDTH_SIZE
            } else {
                RIVER_TILE_SIZE
            },
            river_width,
            volumetric_light,
            embedded_names: version >= 9,
        })
    }
}
