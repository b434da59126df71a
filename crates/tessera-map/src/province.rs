//! Per-tile province overlay.
//!
//! A flat array of 8-byte records, one per tile: `i32` province id followed by
//! the `f32` distance from the tile to its province border. There is no
//! header; the record count is the buffer length divided by eight.

use tessera_records::{RecordReader, RecordWriter};

use crate::error::MapError;

pub const PROVINCE_RECORD_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileProvince {
    pub province: i32,
    pub distance: f32,
}

/// Owns a province overlay buffer.
#[derive(Debug, Clone)]
pub struct ProvinceStore {
    bytes: Vec<u8>,
    modified: bool,
}

impl ProvinceStore {
    /// Take ownership of `bytes`. A trailing partial record is an error.
    pub fn open(bytes: Vec<u8>) -> Result<Self, MapError> {
        if bytes.len() % PROVINCE_RECORD_SIZE != 0 {
            return Err(MapError::Truncated {
                expected: bytes.len().next_multiple_of(PROVINCE_RECORD_SIZE),
                actual: bytes.len(),
            });
        }
        tracing::debug!(tiles = bytes.len() / PROVINCE_RECORD_SIZE, "province overlay opened");
        Ok(Self {
            bytes,
            modified: false,
        })
    }

    /// Overlay for `tile_count` tiles, every tile in province 0.
    pub fn with_tiles(tile_count: usize) -> Self {
        Self {
            bytes: vec![0; tile_count * PROVINCE_RECORD_SIZE],
            modified: false,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / PROVINCE_RECORD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn offset(&self, index: usize) -> Result<usize, MapError> {
        if index < self.len() {
            Ok(index * PROVINCE_RECORD_SIZE)
        } else {
            Err(MapError::IndexOutOfRange {
                kind: "province",
                index,
                count: self.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<TileProvince, MapError> {
        let at = self.offset(index)?;
        let reader = RecordReader::new(&self.bytes);
        Ok(TileProvince {
            province: reader.i32_at(at)?,
            distance: reader.f32_at(at + 4)?,
        })
    }

    /// Assign a province. The stored distance is kept when `distance` is `None`.
    pub fn set(&mut self, index: usize, province: i32, distance: Option<f32>) -> Result<(), MapError> {
        let at = self.offset(index)?;
        let mut writer = RecordWriter::new(&mut self.bytes);
        writer.put_i32(at, province)?;
        if let Some(d) = distance {
            writer.put_f32(at + 4, d)?;
        }
        self.modified = true;
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
