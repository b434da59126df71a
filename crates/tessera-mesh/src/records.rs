//! Decoded mesh records.

use glam::Vec3;

/// Mesh header. Immutable once the store is open.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshHeader {
    pub version: i32,
    pub radius: f32,
    pub corner_count: usize,
    pub border_count: usize,
    pub tile_count: usize,
}

/// A vertex of the tile grid, shared by three tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    pub position: Vec3,
    pub corners: [i32; 3],
    pub borders: [i32; 3],
    pub tiles: [i32; 3],
}

/// An edge between two corners, separating two tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub position: Vec3,
    pub corners: [i32; 2],
    pub tiles: [i32; 2],
}

/// A pentagonal or hexagonal cell.
///
/// `corners`, `borders` and `neighbors` run in the same boundary order and
/// always have the same length (5 or 6).
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub position: Vec3,
    pub corners: Vec<i32>,
    pub borders: Vec<i32>,
    pub neighbors: Vec<i32>,
}

impl Tile {
    /// Number of sides.
    pub fn edge_count(&self) -> usize {
        self.corners.len()
    }

    pub fn is_pentagon(&self) -> bool {
        self.edge_count() == 5
    }
}
