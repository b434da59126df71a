//! Serialises mesh records into the on-disk layout.

use tessera_records::RecordSink;

use crate::error::MeshError;
use crate::layout::{HEADER_SIZE, MeshLayout, edge_count_for};
use crate::records::{Border, Corner, Tile};

/// Accumulates records and writes a complete mesh buffer.
///
/// Tiles must be pushed in slot order: twelve pentagons first, then hexagons.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    version: i32,
    radius: f32,
    corners: Vec<Corner>,
    borders: Vec<Border>,
    tiles: Vec<Tile>,
}

impl MeshBuilder {
    pub fn new(version: i32, radius: f32) -> Self {
        Self {
            version,
            radius,
            corners: Vec::new(),
            borders: Vec::new(),
            tiles: Vec::new(),
        }
    }

    pub fn push_corner(&mut self, corner: Corner) -> &mut Self {
        self.corners.push(corner);
        self
    }

    pub fn push_border(&mut self, border: Border) -> &mut Self {
        self.borders.push(border);
        self
    }

    /// Append a tile. Fails if its lists disagree in length or if its shape
    /// does not fit the next slot.
    pub fn push_tile(&mut self, tile: Tile) -> Result<&mut Self, MeshError> {
        let slot = self.tiles.len();
        let expected = edge_count_for(slot);
        let edges = tile.corners.len();
        if edges != expected || tile.borders.len() != edges || tile.neighbors.len() != edges {
            return Err(MeshError::IrregularTileShape {
                tile: slot,
                edge_count: i32::try_from(edges).unwrap_or(i32::MAX),
                expected,
            });
        }
        self.tiles.push(tile);
        Ok(self)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Write the buffer.
    pub fn build(&self) -> Vec<u8> {
        let capacity = MeshLayout::new(self.corners.len(), self.borders.len(), self.tiles.len())
            .map_or(HEADER_SIZE, |layout| layout.total_len);
        let mut sink = RecordSink::with_capacity(capacity);

        sink.push_i32(self.version);
        sink.push_f32(self.radius);
        sink.push_i32(count(self.corners.len()));
        sink.push_i32(count(self.borders.len()));
        sink.push_i32(count(self.tiles.len()));

        for (slot, corner) in self.corners.iter().enumerate() {
            sink.push_i32(count(slot));
            push_xyz(&mut sink, corner.position.to_array());
            push_all(&mut sink, &corner.corners);
            push_all(&mut sink, &corner.borders);
            push_all(&mut sink, &corner.tiles);
        }
        for (slot, border) in self.borders.iter().enumerate() {
            sink.push_i32(count(slot));
            push_xyz(&mut sink, border.position.to_array());
            push_all(&mut sink, &border.corners);
            push_all(&mut sink, &border.tiles);
        }
        for (slot, tile) in self.tiles.iter().enumerate() {
            sink.push_i32(count(slot));
            push_xyz(&mut sink, tile.position.to_array());
            sink.push_i32(count(tile.edge_count()));
            push_all(&mut sink, &tile.corners);
            push_all(&mut sink, &tile.borders);
            push_all(&mut sink, &tile.neighbors);
        }
        sink.into_bytes()
    }
}

fn count(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn push_xyz(sink: &mut RecordSink, xyz: [f32; 3]) {
    for v in xyz {
        sink.push_f32(v);
    }
}

fn push_all(sink: &mut RecordSink, values: &[i32]) {
    for &v in values {
        sink.push_i32(v);
    }
}
