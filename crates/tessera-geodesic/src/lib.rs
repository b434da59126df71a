//! Closed-form geographic lookup on the subdivided icosahedron.
//!
//! The mesh corners are the cells of a triangular grid laid over each of the
//! twenty icosahedron faces. [`GeodesicIndex`] turns a longitude/latitude into
//! a face hit, the hit into a grid cell, and the cell into a corner index by
//! arithmetic alone. The tile is then chosen among the three tiles meeting at
//! that corner, read through any [`CornerTiles`] source.

mod corner_tiles;
mod error;
pub mod grid;
pub mod icosahedron;
mod index;

pub use corner_tiles::{CornerTileCache, CornerTiles};
pub use error::GeodesicError;
pub use grid::{Orientation, SubTriangle, SubdivisionGrid};
pub use icosahedron::{FACE_COUNT, Face, FaceHit};
pub use index::{
    CornerHit, FACE_TOLERANCE, GeodesicIndex, lon_lat_to_direction, nearest_candidate, quantize,
};
