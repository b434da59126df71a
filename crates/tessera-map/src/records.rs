//! Decoded map records and the tile write patch.

/// Map header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapHeader {
    pub version: i32,
    pub tile_count: usize,
    pub corner_count: usize,
    pub river_count: usize,
    pub mountain_count: usize,
}

/// Per-tile simulation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTile {
    pub elevation: f32,
    pub water_elevation: f32,
    pub temperature: f32,
    pub moisture: f32,
    /// Terrain texture id.
    pub terrain: u8,
    /// Tree-table id of the vegetation on this tile.
    pub vegetation: u8,
    /// Climate class.
    pub biome: u8,
    /// Raw vegetation class the `vegetation` id was derived from.
    pub vegetation_data: u8,
    /// Model-table id of the decoration, `-1` for none.
    pub decoration: i16,
    /// Present from version 8.
    pub volumetric_light: Option<f32>,
}

/// Per-corner state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapCorner {
    pub cliff: u8,
}

/// One tile along a river's course.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiverSegment {
    pub tile: i32,
    /// Present from version 7.
    pub width: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct River {
    pub segments: Vec<RiverSegment>,
}

impl River {
    pub fn tiles(&self) -> impl Iterator<Item = i32> + '_ {
        self.segments.iter().map(|s| s.tile)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Mountain {
    pub tiles: Vec<i32>,
}

/// Fields to overwrite on a tile. `None` leaves the stored value alone.
///
/// `terrain` and `decoration` are wider than their record slots so that
/// out-of-range values can be reported instead of truncated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TilePatch {
    pub elevation: Option<f32>,
    pub water_elevation: Option<f32>,
    pub temperature: Option<f32>,
    pub moisture: Option<f32>,
    /// Must be within `0..=255`.
    pub terrain: Option<i32>,
    pub vegetation: Option<u8>,
    pub biome: Option<u8>,
    pub vegetation_data: Option<u8>,
    /// Must be `-1` or a valid `i16` model id.
    pub decoration: Option<i32>,
    /// Dropped without error on maps older than version 8.
    pub volumetric_light: Option<f32>,
}

impl TilePatch {
    pub fn elevation(mut self, value: f32) -> Self {
        self.elevation = Some(value);
        self
    }

    pub fn water_elevation(mut self, value: f32) -> Self {
        self.water_elevation = Some(value);
        self
    }

    pub fn terrain(mut self, value: i32) -> Self {
        self.terrain = Some(value);
        self
    }

    pub fn vegetation(mut self, value: u8) -> Self {
        self.vegetation = Some(value);
        self
    }

    pub fn decoration(mut self, value: i32) -> Self {
        self.decoration = Some(value);
        self
    }

    pub fn volumetric_light(mut self, value: f32) -> Self {
        self.volumetric_light = Some(value);
        self
    }

    /// Returns true if the patch writes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
