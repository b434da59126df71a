//! Byte layout of the mesh buffer.
//!
//! ## Binary Layout
//!
//! | Section | Record size | Count |
//! |---------|-------------|-------|
//! | Header | 20 | 1 |
//! | Corners | 52 | `corner_count` |
//! | Borders | 32 | `border_count` |
//! | Pentagon tiles | 80 | first 12 tiles |
//! | Hexagon tiles | 92 | remaining tiles |
//!
//! Every record opens with a 4-byte slot that readers skip. Header fields are
//! `i32 version, f32 radius, i32 corner_count, i32 border_count, i32 tile_count`.
//!
//! Corner record: slot, `f32` x y z at +4, three corner indices at +16, three
//! border indices at +28, three tile indices at +40.
//!
//! Border record: slot, x y z at +4, two corner indices at +16, two tile
//! indices at +24.
//!
//! Tile record: slot, x y z at +4, `i32` edge count at +16, then the corner,
//! border and neighbour index lists back to back from +20.

use static_assertions::const_assert_eq;

pub const HEADER_SIZE: usize = 20;
pub const CORNER_RECORD_SIZE: usize = 52;
pub const BORDER_RECORD_SIZE: usize = 32;
pub const PENTAGON_RECORD_SIZE: usize = 80;
pub const HEXAGON_RECORD_SIZE: usize = 92;

/// Number of five-sided tiles, one per icosahedron apex. They always lead the
/// tile section.
pub const PENTAGON_COUNT: usize = 12;

pub(crate) const POSITION_OFFSET: usize = 4;
pub(crate) const CORNER_CORNERS_OFFSET: usize = 16;
pub(crate) const CORNER_BORDERS_OFFSET: usize = 28;
pub(crate) const CORNER_TILES_OFFSET: usize = 40;
pub(crate) const BORDER_CORNERS_OFFSET: usize = 16;
pub(crate) const BORDER_TILES_OFFSET: usize = 24;
pub(crate) const TILE_EDGE_COUNT_OFFSET: usize = 16;
pub(crate) const TILE_LISTS_OFFSET: usize = 20;

const_assert_eq!(CORNER_RECORD_SIZE, CORNER_TILES_OFFSET + 3 * 4);
const_assert_eq!(BORDER_RECORD_SIZE, BORDER_TILES_OFFSET + 2 * 4);
const_assert_eq!(PENTAGON_RECORD_SIZE, TILE_LISTS_OFFSET + 3 * 5 * 4);
const_assert_eq!(HEXAGON_RECORD_SIZE, TILE_LISTS_OFFSET + 3 * 6 * 4);

/// Edge count implied by a tile's position in the tile section.
#[inline]
#[must_use]
pub fn edge_count_for(tile: usize) -> usize {
    if tile < PENTAGON_COUNT { 5 } else { 6 }
}

/// Byte length of the tile section holding `tile_count` tiles.
#[must_use]
pub fn tile_section_len(tile_count: usize) -> usize {
    let pentagons = tile_count.min(PENTAGON_COUNT);
    let hexagons = tile_count.saturating_sub(PENTAGON_COUNT);
    pentagons * PENTAGON_RECORD_SIZE + hexagons * HEXAGON_RECORD_SIZE
}

/// Section offsets derived once from the header counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshLayout {
    pub corner_count: usize,
    pub border_count: usize,
    pub tile_count: usize,
    pub corners_start: usize,
    pub borders_start: usize,
    pub tiles_start: usize,
    pub total_len: usize,
}

impl MeshLayout {
    /// Compute section offsets. Returns `None` if the total length overflows.
    pub fn new(corner_count: usize, border_count: usize, tile_count: usize) -> Option<Self> {
        let corners_start = HEADER_SIZE;
        let borders_start = corner_count
            .checked_mul(CORNER_RECORD_SIZE)?
            .checked_add(corners_start)?;
        let tiles_start = border_count
            .checked_mul(BORDER_RECORD_SIZE)?
            .checked_add(borders_start)?;
        let hexagons = tile_count.saturating_sub(PENTAGON_COUNT);
        let total_len = hexagons
            .checked_mul(HEXAGON_RECORD_SIZE)?
            .checked_add(tile_count.min(PENTAGON_COUNT) * PENTAGON_RECORD_SIZE)?
            .checked_add(tiles_start)?;
        Some(Self {
            corner_count,
            border_count,
            tile_count,
            corners_start,
            borders_start,
            tiles_start,
            total_len,
        })
    }

    #[inline]
    pub fn corner_offset(&self, index: usize) -> usize {
        self.corners_start + index * CORNER_RECORD_SIZE
    }

    #[inline]
    pub fn border_offset(&self, index: usize) -> usize {
        self.borders_start + index * BORDER_RECORD_SIZE
    }

    /// Offset of tile `index`. Pentagons are packed first, so the hexagon
    /// offsets are shifted by the twelve shorter records.
    #[inline]
    pub fn tile_offset(&self, index: usize) -> usize {
        self.tiles_start + tile_section_len(index)
    }
}
