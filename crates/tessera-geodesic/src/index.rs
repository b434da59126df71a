//! Closed-form longitude/latitude to corner and tile lookup.

use glam::DVec3;

use crate::corner_tiles::CornerTiles;
use crate::error::GeodesicError;
use crate::grid::{SubTriangle, SubdivisionGrid};
use crate::icosahedron::{FACE_COUNT, Face, FaceHit, faces, first_hit};

/// Barycentric tolerance for the face test. Zero: a point on a shared edge
/// goes to whichever face comes first in table order.
pub const FACE_TOLERANCE: f64 = 0.0;

/// Input coordinates are floored to this many steps per degree, then nudged
/// up by one step.
const QUANTIZE_STEPS: f64 = 10_000.0;

/// Snap a coordinate to the mesh generator's grid: floor to four decimals,
/// then add `0.0001`.
#[inline]
#[must_use]
pub fn quantize(degrees: f64) -> f64 {
    (degrees * QUANTIZE_STEPS).floor() / QUANTIZE_STEPS + 1.0 / QUANTIZE_STEPS
}

/// Unit direction for a quantized longitude/latitude in degrees.
///
/// Uses the polar angle `latitude + 90°`, so the result is
/// `(cos lat·cos lon, sin lat, −cos lat·sin lon)`.
pub fn lon_lat_to_direction(longitude: f64, latitude: f64) -> DVec3 {
    let lon = quantize(longitude).to_radians();
    let polar = (quantize(latitude) + 90.0).to_radians();
    DVec3::new(
        polar.sin() * lon.cos(),
        -polar.cos(),
        -polar.sin() * lon.sin(),
    )
    .normalize_or_zero()
}

/// Candidate with the smallest distance `1 − bary[k]`. Ties go to the
/// lowest position.
#[must_use]
pub fn nearest_candidate(bary: &[f64; 3]) -> usize {
    let mut best = 0;
    for k in 1..3 {
        if 1.0 - bary[k] < 1.0 - bary[best] {
            best = k;
        }
    }
    best
}

/// Result of locating a direction on the corner grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerHit {
    pub corner: usize,
    pub sub_triangle: SubTriangle,
    /// Weights of the point inside the cell, one per surrounding tile.
    pub bary: [f64; 3],
    pub face_hit: FaceHit,
}

/// Maps geographic coordinates to mesh corners and tiles without searching
/// the tile list.
#[derive(Clone, Debug)]
pub struct GeodesicIndex {
    faces: [Face; FACE_COUNT],
    grid: SubdivisionGrid,
}

impl GeodesicIndex {
    /// Index for a mesh with `corner_count` corners.
    pub fn new(corner_count: usize) -> Result<Self, GeodesicError> {
        let grid = SubdivisionGrid::new(corner_count)?;
        tracing::debug!(
            corner_count,
            split_count = grid.split_count(),
            "geodesic index ready"
        );
        Ok(Self {
            faces: faces(),
            grid,
        })
    }

    pub fn grid(&self) -> &SubdivisionGrid {
        &self.grid
    }

    pub fn faces(&self) -> &[Face; FACE_COUNT] {
        &self.faces
    }

    /// Corner whose cell contains the unit direction `dir`.
    pub fn locate_corner(&self, dir: DVec3) -> Result<CornerHit, GeodesicError> {
        let face_hit =
            first_hit(&self.faces, dir, FACE_TOLERANCE).ok_or(GeodesicError::NoIntersectingFace {
                x: dir.x,
                y: dir.y,
                z: dir.z,
            })?;
        let (sub_triangle, bary) = self.grid.locate(&face_hit);
        let corner = self.grid.corner_index(&sub_triangle);
        if corner >= self.grid.corner_count() {
            return Err(GeodesicError::CornerOutOfRange {
                corner,
                count: self.grid.corner_count(),
            });
        }
        Ok(CornerHit {
            corner,
            sub_triangle,
            bary,
            face_hit,
        })
    }

    pub fn lon_lat_to_corner(&self, longitude: f64, latitude: f64) -> Result<CornerHit, GeodesicError> {
        self.locate_corner(lon_lat_to_direction(longitude, latitude))
    }

    /// Tile containing the given coordinate.
    ///
    /// Of the three tiles around the located corner, picks the one whose
    /// weight is largest.
    pub fn lon_lat_to_tile<T: CornerTiles + ?Sized>(
        &self,
        longitude: f64,
        latitude: f64,
        tiles: &T,
    ) -> Result<usize, GeodesicError> {
        let hit = self.lon_lat_to_corner(longitude, latitude)?;
        self.tile_for(&hit, tiles)
    }

    /// Resolve a located corner to a tile through `tiles`.
    pub fn tile_for<T: CornerTiles + ?Sized>(
        &self,
        hit: &CornerHit,
        tiles: &T,
    ) -> Result<usize, GeodesicError> {
        let around = tiles
            .tiles_around(hit.corner)
            .ok_or(GeodesicError::CornerOutOfRange {
                corner: hit.corner,
                count: tiles.corner_count(),
            })?;
        let tile = around[nearest_candidate(&hit.bary)];
        usize::try_from(tile).map_err(|_| GeodesicError::InvalidCornerTile {
            corner: hit.corner,
            tile,
        })
    }

    /// Unit direction through the centroid of a corner's cell.
    pub fn corner_direction(&self, corner: usize) -> Option<DVec3> {
        let sub = self.grid.sub_triangle(corner)?;
        let (beta, gamma) = self.grid.centroid_weights(&sub);
        Some(self.faces[sub.face].sample(beta, gamma).normalize())
    }
}
