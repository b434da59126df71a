//! Per-tile map state for the icosphere tile grid.
//!
//! [`MapStore`] owns a versioned map buffer: fixed-stride tile and corner
//! records, then length-prefixed rivers and mountain ranges. Field presence is
//! decided once from the header version through [`MapCapabilities`]. The
//! tree/model [`NameTable`] is embedded from version 9 and shipped separately
//! before that. [`ProvinceStore`] handles the province overlay file.

mod builder;
pub mod caps;
mod error;
pub mod layout;
pub mod names;
mod province;
mod records;
mod sequence;
mod store;

pub use builder::MapBuilder;
pub use caps::{MAX_MAP_VERSION, MIN_MAP_VERSION, MapCapabilities};
pub use error::MapError;
pub use layout::MapLayout;
pub use names::{ModelName, NameSchema, NameTable, NameTableError, TreeName};
pub use province::{PROVINCE_RECORD_SIZE, ProvinceStore, TileProvince};
pub use records::{MapCorner, MapHeader, MapTile, Mountain, River, RiverSegment, TilePatch};
pub use sequence::{MountainIter, RiverIter};
pub use store::MapStore;
