//! One loaded planet: mesh, map and the indices built over them.
//!
//! [`PlanetContext`] is constructed once per map with
//! [`PlanetContext::open`] and handed back with [`PlanetContext::close`].
//! It answers the queries rendering and editing code needs: tile and corner
//! records, zone membership, visible zones and coordinate lookup.

mod context;
mod error;

pub use context::{ContextOptions, CornerView, PlanetBuffers, PlanetContext, PlanetPaths, TileView};
pub use error::ContextError;
