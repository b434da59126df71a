//! Tree and model name table.
//!
//! ## Binary Layout
//!
//! | Field | Size | Notes |
//! |-------|------|-------|
//! | Tag | 1 | `0xFF`, tagged schema only |
//! | Schema version | 1 | tagged schema only |
//! | Tree count | 4 | `u32` |
//! | Tree entries | var | `u8` id, var-len string |
//! | Model count | 4 | `u32` |
//! | Model entries | var | `i16` id (tagged) or `u8` id (legacy), var-len string |
//!
//! A table without the tag byte is the legacy schema. Maps from version 9
//! embed the table after the header; older maps ship it as a separate buffer.

use tessera_records::{RecordCursor, RecordError, RecordSink};

/// Leading byte that marks the tagged schema.
pub const NAME_TABLE_TAG: u8 = 0xFF;

/// Errors raised while decoding or encoding a name table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameTableError {
    /// The tag byte is present but the schema version byte is zero.
    #[error("tagged name table declares schema version {0}")]
    UnsupportedSchemaVersion(u8),

    /// A separate name buffer was supplied for a map that embeds its own.
    #[error("map version {0} embeds its name table; a separate one cannot be attached")]
    ExternalTableForEmbeddedVersion(i32),

    /// A model id does not fit the legacy schema's single-byte id.
    #[error("model id {0} cannot be stored in the legacy schema")]
    ModelIdOutOfRange(i16),

    /// An entry count does not fit the `u32` count field.
    #[error("{0} entries exceed the table count field")]
    TooManyEntries(usize),

    /// A field read or string encode failed.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Which generation of the table layout is in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameSchema {
    /// No tag byte, single-byte model ids.
    Legacy,
    /// Tag byte plus schema version, two-byte model ids.
    Tagged { version: u8 },
}

/// Vegetation name keyed by the tile's vegetation byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeName {
    pub id: u8,
    pub name: String,
}

/// Decoration model name keyed by the tile's decoration id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelName {
    pub id: i16,
    pub name: String,
}

/// Decoded name table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTable {
    pub schema: NameSchema,
    pub trees: Vec<TreeName>,
    pub models: Vec<ModelName>,
}

impl NameTable {
    /// Empty table in the tagged schema.
    pub fn new(schema_version: u8) -> Self {
        Self {
            schema: NameSchema::Tagged {
                version: schema_version,
            },
            trees: Vec::new(),
            models: Vec::new(),
        }
    }

    /// Decode a table starting at the front of `bytes`.
    ///
    /// Returns the table and the number of bytes it occupies.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), NameTableError> {
        Self::decode_at(bytes, 0)
    }

    /// Decode a table starting at `start`. Returns the table and its byte
    /// length.
    pub fn decode_at(bytes: &[u8], start: usize) -> Result<(Self, usize), NameTableError> {
        let mut cursor = RecordCursor::new(bytes, start);
        let schema = if bytes.get(start) == Some(&NAME_TABLE_TAG) {
            cursor.skip(1)?;
            let version = cursor.read_u8()?;
            if version == 0 {
                return Err(NameTableError::UnsupportedSchemaVersion(version));
            }
            NameSchema::Tagged { version }
        } else {
            NameSchema::Legacy
        };

        let tree_count = cursor.read_u32()? as usize;
        let mut trees = Vec::with_capacity(tree_count.min(cursor.remaining()));
        for _ in 0..tree_count {
            let id = cursor.read_u8()?;
            let name = cursor.read_string()?;
            trees.push(TreeName { id, name });
        }

        let model_count = cursor.read_u32()? as usize;
        let mut models = Vec::with_capacity(model_count.min(cursor.remaining()));
        for _ in 0..model_count {
            let id = match schema {
                NameSchema::Tagged { .. } => cursor.read_i16()?,
                NameSchema::Legacy => i16::from(cursor.read_u8()?),
            };
            let name = cursor.read_string()?;
            models.push(ModelName { id, name });
        }

        let len = cursor.position() - start;
        tracing::debug!(
            ?schema,
            trees = trees.len(),
            models = models.len(),
            len,
            "name table decoded"
        );
        Ok((
            Self {
                schema,
                trees,
                models,
            },
            len,
        ))
    }

    /// Serialise in the table's own schema.
    pub fn encode(&self) -> Result<Vec<u8>, NameTableError> {
        let mut sink = RecordSink::new();
        let tagged = match self.schema {
            NameSchema::Tagged { version } => {
                if version == 0 {
                    return Err(NameTableError::UnsupportedSchemaVersion(version));
                }
                sink.push_u8(NAME_TABLE_TAG);
                sink.push_u8(version);
                true
            }
            NameSchema::Legacy => false,
        };

        sink.push_u32(entry_count(self.trees.len())?);
        for tree in &self.trees {
            sink.push_u8(tree.id);
            sink.push_string(&tree.name)?;
        }

        sink.push_u32(entry_count(self.models.len())?);
        for model in &self.models {
            if tagged {
                sink.push_i16(model.id);
            } else {
                let id = u8::try_from(model.id)
                    .map_err(|_| NameTableError::ModelIdOutOfRange(model.id))?;
                sink.push_u8(id);
            }
            sink.push_string(&model.name)?;
        }
        Ok(sink.into_bytes())
    }

    pub fn tree_name(&self, id: u8) -> Option<&str> {
        self.trees
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    pub fn model_name(&self, id: i16) -> Option<&str> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
    }
}

fn entry_count(len: usize) -> Result<u32, NameTableError> {
    u32::try_from(len).map_err(|_| NameTableError::TooManyEntries(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(schema: NameSchema) -> NameTable {
        NameTable {
            schema,
            trees: vec![
                TreeName {
                    id: 1,
                    name: "birch".into(),
                },
                TreeName {
                    id: 7,
                    name: "pine_\u{e9}".into(),
                },
            ],
            models: vec![ModelName {
                id: 42,
                name: "watchtower".into(),
            }],
        }
    }

    #[test]
    fn test_tagged_roundtrip() {
        let table = sample(NameSchema::Tagged { version: 2 });
        let bytes = table.encode().unwrap();
        assert_eq!(bytes[0], NAME_TABLE_TAG);
        let (decoded, len) = NameTable::decode(&bytes).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(len, bytes.len());
    }

    #[test]
    fn test_legacy_roundtrip() {
        let table = sample(NameSchema::Legacy);
        let bytes = table.encode().unwrap();
        let (decoded, len) = NameTable::decode(&bytes).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(len, bytes.len());
        assert_eq!(decoded.tree_name(7), Some("pine_\u{e9}"));
        assert_eq!(decoded.model_name(42), Some("watchtower"));
        assert_eq!(decoded.model_name(1), None);
    }

    #[test]
    fn test_tagged_model_ids_are_two_bytes() {
        let mut table = NameTable::new(1);
        table.models.push(ModelName {
            id: 300,
            name: "keep".into(),
        });
        let bytes = table.encode().unwrap();
        // tag + version + tree count + model count + id + len + "keep"
        assert_eq!(bytes.len(), 2 + 4 + 4 + 2 + 1 + 4);
        let (decoded, _) = NameTable::decode(&bytes).unwrap();
        assert_eq!(decoded.models[0].id, 300);
    }

    #[test]
    fn test_legacy_rejects_wide_model_id() {
        let mut table = sample(NameSchema::Legacy);
        table.models[0].id = 256;
        assert_eq!(
            table.encode(),
            Err(NameTableError::ModelIdOutOfRange(256))
        );
    }

    #[test]
    fn test_zero_schema_version_rejected() {
        let bytes = [NAME_TABLE_TAG, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            NameTable::decode(&bytes),
            Err(NameTableError::UnsupportedSchemaVersion(0))
        );
    }

    #[test]
    fn test_truncated_table() {
        let bytes = sample(NameSchema::Legacy).encode().unwrap();
        assert!(matches!(
            NameTable::decode(&bytes[..bytes.len() - 3]),
            Err(NameTableError::Record(RecordError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_decode_at_offset_reports_own_length() {
        let table = sample(NameSchema::Tagged { version: 1 });
        let encoded = table.encode().unwrap();
        let mut bytes = vec![9u8; 20];
        bytes.extend_from_slice(&encoded);
        bytes.extend_from_slice(&[1, 2, 3]);
        let (decoded, len) = NameTable::decode_at(&bytes, 20).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(len, encoded.len());
    }
}
