//! Random-access decoding of the mesh buffer.

use glam::Vec3;
use tessera_records::RecordReader;

use crate::error::MeshError;
use crate::layout::{
    BORDER_CORNERS_OFFSET, BORDER_TILES_OFFSET, CORNER_BORDERS_OFFSET, CORNER_CORNERS_OFFSET,
    CORNER_TILES_OFFSET, HEADER_SIZE, MeshLayout, POSITION_OFFSET, TILE_EDGE_COUNT_OFFSET,
    TILE_LISTS_OFFSET, edge_count_for,
};
use crate::progress::{ProgressSink, ProgressTicker, SweepStage};
use crate::records::{Border, Corner, MeshHeader, Tile};

/// Owns a mesh buffer and decodes records from it on demand.
///
/// Record offsets are fixed by the header counts, so every accessor is O(1).
/// Index accessors return `None` past the end instead of failing, which lets
/// lookups probe candidates without error plumbing.
#[derive(Debug)]
pub struct MeshStore {
    bytes: Vec<u8>,
    header: MeshHeader,
    layout: MeshLayout,
}

impl MeshStore {
    /// Validate the header and take ownership of `bytes`.
    ///
    /// Fails if the buffer is shorter than the header or than the record
    /// counts the header declares. Trailing bytes are tolerated.
    pub fn open(bytes: Vec<u8>) -> Result<Self, MeshError> {
        if bytes.len() < HEADER_SIZE {
            return Err(MeshError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let reader = RecordReader::new(&bytes);
        let version = reader.i32_at(0)?;
        if version < 1 {
            return Err(MeshError::UnsupportedVersion(version));
        }
        let radius = reader.f32_at(4)?;
        let corner_count = count_field(&reader, 8, "corner count")?;
        let border_count = count_field(&reader, 12, "border count")?;
        let tile_count = count_field(&reader, 16, "tile count")?;

        let layout = MeshLayout::new(corner_count, border_count, tile_count)
            .ok_or(MeshError::LayoutOverflow)?;
        if bytes.len() < layout.total_len {
            return Err(MeshError::Truncated {
                expected: layout.total_len,
                actual: bytes.len(),
            });
        }

        let header = MeshHeader {
            version,
            radius,
            corner_count,
            border_count,
            tile_count,
        };
        tracing::info!(
            version,
            radius,
            corners = corner_count,
            borders = border_count,
            tiles = tile_count,
            "mesh opened"
        );
        Ok(Self {
            bytes,
            header,
            layout,
        })
    }

    pub fn header(&self) -> MeshHeader {
        self.header
    }

    pub fn layout(&self) -> &MeshLayout {
        &self.layout
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

    /// Corner `index`, or `None` past the end.
    pub fn corner(&self, index: usize) -> Option<Corner> {
        if index >= self.header.corner_count {
            return None;
        }
        let base = self.layout.corner_offset(index);
        let reader = self.reader();
        Some(Corner {
            position: read_vec3(&reader, base + POSITION_OFFSET).ok()?,
            corners: read_indices(&reader, base + CORNER_CORNERS_OFFSET).ok()?,
            borders: read_indices(&reader, base + CORNER_BORDERS_OFFSET).ok()?,
            tiles: read_indices(&reader, base + CORNER_TILES_OFFSET).ok()?,
        })
    }

    /// The three tiles meeting at corner `index`, without decoding the rest
    /// of the record.
    pub fn corner_tiles(&self, index: usize) -> Option<[i32; 3]> {
        if index >= self.header.corner_count {
            return None;
        }
        let base = self.layout.corner_offset(index);
        read_indices(&self.reader(), base + CORNER_TILES_OFFSET).ok()
    }

    /// Border `index`, or `None` past the end.
    pub fn border(&self, index: usize) -> Option<Border> {
        if index >= self.header.border_count {
            return None;
        }
        let base = self.layout.border_offset(index);
        let reader = self.reader();
        Some(Border {
            position: read_vec3(&reader, base + POSITION_OFFSET).ok()?,
            corners: read_indices(&reader, base + BORDER_CORNERS_OFFSET).ok()?,
            tiles: read_indices(&reader, base + BORDER_TILES_OFFSET).ok()?,
        })
    }

    /// Tile `index`, or `None` past the end.
    ///
    /// The list lengths come from the tile's slot (5 for the first twelve,
    /// 6 after), not from the stored edge count.
    pub fn tile(&self, index: usize) -> Option<Tile> {
        if index >= self.header.tile_count {
            return None;
        }
        let base = self.layout.tile_offset(index);
        let edges = edge_count_for(index);
        let reader = self.reader();
        let list = |n: usize| -> Option<Vec<i32>> {
            let start = base + TILE_LISTS_OFFSET + n * edges * 4;
            (0..edges)
                .map(|k| reader.i32_at(start + k * 4).ok())
                .collect()
        };
        Some(Tile {
            position: read_vec3(&reader, base + POSITION_OFFSET).ok()?,
            corners: list(0)?,
            borders: list(1)?,
            neighbors: list(2)?,
        })
    }

    /// Centre of tile `index` without decoding its index lists.
    pub fn tile_position(&self, index: usize) -> Option<Vec3> {
        if index >= self.header.tile_count {
            return None;
        }
        read_vec3(&self.reader(), self.layout.tile_offset(index) + POSITION_OFFSET).ok()
    }

    pub fn corners(&self) -> impl Iterator<Item = Corner> + '_ {
        (0..self.header.corner_count).filter_map(|i| self.corner(i))
    }

    pub fn borders(&self) -> impl Iterator<Item = Border> + '_ {
        (0..self.header.border_count).filter_map(|i| self.border(i))
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.header.tile_count).filter_map(|i| self.tile(i))
    }

    /// Check that every tile's stored edge count matches its slot.
    ///
    /// Tile records are addressed by slot, so a mesh whose pentagons are not
    /// packed first would decode silently wrong; this sweep catches it.
    pub fn verify_tile_shapes(
        &self,
        interval: usize,
        progress: &mut dyn ProgressSink,
    ) -> Result<(), MeshError> {
        let reader = self.reader();
        let mut ticker = ProgressTicker::new(SweepStage::TileShapes, self.header.tile_count, interval);
        for tile in 0..self.header.tile_count {
            let stored = reader.i32_at(self.layout.tile_offset(tile) + TILE_EDGE_COUNT_OFFSET)?;
            let expected = edge_count_for(tile);
            if usize::try_from(stored).ok() != Some(expected) {
                return Err(MeshError::IrregularTileShape {
                    tile,
                    edge_count: stored,
                    expected,
                });
            }
            ticker.tick(progress);
        }
        ticker.finish(progress);
        Ok(())
    }
}

fn count_field(
    reader: &RecordReader<'_>,
    offset: usize,
    field: &'static str,
) -> Result<usize, MeshError> {
    let value = reader.i32_at(offset)?;
    usize::try_from(value).map_err(|_| MeshError::NegativeCount { field, value })
}

fn read_vec3(reader: &RecordReader<'_>, offset: usize) -> Result<Vec3, MeshError> {
    Ok(Vec3::new(
        reader.f32_at(offset)?,
        reader.f32_at(offset + 4)?,
        reader.f32_at(offset + 8)?,
    ))
}

fn read_indices<const N: usize>(
    reader: &RecordReader<'_>,
    offset: usize,
) -> Result<[i32; N], MeshError> {
    let mut out = [0i32; N];
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = reader.i32_at(offset + k * 4)?;
    }
    Ok(out)
}
