//! Subdivision of each icosahedron face into `split_count²` small triangles.
//!
//! Each face is cut into a triangular grid with `split_count` cells per
//! edge. Cells alternate between upward and downward triangles like a
//! checkerboard. Upward cells are numbered first, row by row: row `r` holds
//! `split_count - r` of them. Downward cells follow, with `split_count - 1 - r`
//! in row `r`. Every cell is one mesh corner, so a face owns
//! `split_count²` consecutive corner indices.

use crate::error::GeodesicError;
use crate::icosahedron::{FACE_COUNT, FaceHit};

/// Which way a grid cell points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Shares its base with the row below; even parity.
    Up,
    /// Sits between two upward cells; odd parity.
    Down,
}

impl Orientation {
    fn parity(self) -> usize {
        match self {
            Orientation::Up => 0,
            Orientation::Down => 1,
        }
    }
}

/// A grid cell on one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubTriangle {
    pub face: usize,
    pub row: usize,
    pub col: usize,
    pub orientation: Orientation,
}

/// Grid dimensions derived from a mesh corner count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubdivisionGrid {
    corner_count: usize,
    split_count: usize,
    area_per_face: usize,
    half: usize,
}

impl SubdivisionGrid {
    /// The grid implied by `corner_count`. Fails unless the count is twenty
    /// times a non-zero perfect square.
    pub fn new(corner_count: usize) -> Result<Self, GeodesicError> {
        if corner_count == 0 || corner_count % FACE_COUNT != 0 {
            return Err(GeodesicError::IrregularCornerCount(corner_count));
        }
        let area_per_face = corner_count / FACE_COUNT;
        let split_count = (area_per_face as f64).sqrt().round() as usize;
        if split_count * split_count != area_per_face {
            return Err(GeodesicError::IrregularCornerCount(corner_count));
        }
        Ok(Self {
            corner_count,
            split_count,
            area_per_face,
            half: split_count * (split_count + 1) / 2,
        })
    }

    pub fn corner_count(&self) -> usize {
        self.corner_count
    }

    /// Cells per face edge.
    pub fn split_count(&self) -> usize {
        self.split_count
    }

    /// Corners owned by each face.
    pub fn area_per_face(&self) -> usize {
        self.area_per_face
    }

    /// Find the cell containing a face hit and the point's weights inside it.
    ///
    /// The face weights are first re-expressed against the reference triangle
    /// `(0,0,0)-(0,1,1)-(1,0,1)`, giving `(u, v, w) = (gamma, beta, beta+gamma)`.
    /// Scaled by `split_count`, the integer parts pick the cell and their
    /// parity its orientation. The cell weights are remapped per orientation
    /// and clamped to `[0, 1]`.
    pub fn locate(&self, hit: &FaceHit) -> (SubTriangle, [f64; 3]) {
        let s = self.split_count as f64;
        let idf = [hit.gamma * s, hit.beta * s, (hit.beta + hit.gamma) * s];
        let id3 = idf.map(|v| v.floor().max(0.0));
        let parity = (id3[0] + id3[1] + id3[2]) as u64 % 2;

        let (orientation, bary) = if parity == 1 {
            (
                Orientation::Down,
                [
                    1.0 - (idf[0] - id3[0]),
                    idf[2] - id3[2],
                    1.0 - (idf[1] - id3[1]),
                ],
            )
        } else {
            (
                Orientation::Up,
                [
                    1.0 - (idf[2] - id3[2]),
                    idf[1] - id3[1],
                    idf[0] - id3[0],
                ],
            )
        };

        let sub = SubTriangle {
            face: hit.face,
            row: id3[0] as usize,
            col: id3[1] as usize,
            orientation,
        };
        (sub, bary.map(|b| b.clamp(0.0, 1.0)))
    }

    /// Corner index of a cell, in closed form.
    ///
    /// The row offset is the arithmetic series of the row lengths before it:
    /// `row · (2m − row + 1) / 2` with `m = split_count − parity`.
    #[inline]
    pub fn corner_index(&self, sub: &SubTriangle) -> usize {
        let parity = sub.orientation.parity();
        let m = self.split_count - parity;
        let row_offset = sub.row * (2 * m + 1 - sub.row.min(2 * m + 1)) / 2;
        sub.face * self.area_per_face + row_offset + sub.col + parity * self.half
    }

    /// The cell a corner index belongs to. `None` past the last corner.
    pub fn sub_triangle(&self, corner: usize) -> Option<SubTriangle> {
        if corner >= self.corner_count {
            return None;
        }
        let face = corner / self.area_per_face;
        let mut local = corner % self.area_per_face;
        let orientation = if local < self.half {
            Orientation::Up
        } else {
            local -= self.half;
            Orientation::Down
        };
        let mut row_len = self.split_count - orientation.parity();
        let mut row = 0;
        while local >= row_len {
            local -= row_len;
            row_len -= 1;
            row += 1;
        }
        Some(SubTriangle {
            face,
            row,
            col: local,
            orientation,
        })
    }

    /// Face weights `(beta, gamma)` of a cell's centroid.
    pub fn centroid_weights(&self, sub: &SubTriangle) -> (f64, f64) {
        let s = self.split_count as f64;
        let offset = match sub.orientation {
            Orientation::Up => 1.0 / 3.0,
            Orientation::Down => 2.0 / 3.0,
        };
        ((sub.col as f64 + offset) / s, (sub.row as f64 + offset) / s)
    }
}
