//! Geographic zones over the tile grid.
//!
//! Tiles are grouped into coarse latitude/longitude cells ([`GisZone`]) with
//! the polar caps merged ([`ZoneKey`]). [`ZonePartition`] assigns every tile
//! once at load; [`QuadTree`] indexes the cells for frustum queries and
//! [`flood_visible`] grows a visible set over zone adjacency.

mod error;
mod flood;
pub mod frustum;
pub mod geo;
mod partition;
pub mod quadtree;
pub mod zone;

pub use error::ZoneError;
pub use flood::flood_visible;
pub use frustum::{Aabb, Frustum};
pub use geo::{GeoCoord, geo_to_point, mesh_to_render, point_to_geo};
pub use partition::ZonePartition;
pub use quadtree::{DEFAULT_QUADTREE_DEPTH, QuadTree, ZoneData, node_aabb};
pub use zone::{GeoBounds, GisZone, LAT_BANDS, LAT_DIVIDER, LNG_BANDS, LNG_DIVIDER, ZoneKey};
