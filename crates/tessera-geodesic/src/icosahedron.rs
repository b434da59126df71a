//! The twenty icosahedron faces and the ray/face test.
//!
//! Face vertices are built from the golden ratio: with `du = 1/sqrt(phi²+1)`
//! and `dv = phi·du` every vertex is a permutation of `(0, ±dv, ±du)` on the
//! unit sphere. Face order and vertex order within a face are fixed; the
//! corner numbering of the mesh depends on both.

use glam::DVec3;

/// Vertex coordinate codes: `0` is zero, `±1` is `±du`, `±2` is `±dv`.
const FACE_CODES: [[[i8; 3]; 3]; 20] = [
    [[0, 2, 1], [0, 2, -1], [2, 1, 0]],
    [[0, 2, 1], [1, 0, 2], [-1, 0, 2]],
    [[0, 2, 1], [-1, 0, 2], [-2, 1, 0]],
    [[0, 2, 1], [2, 1, 0], [1, 0, 2]],
    [[0, 2, 1], [-2, 1, 0], [0, 2, -1]],
    [[0, 2, -1], [1, 0, -2], [2, 1, 0]],
    [[0, 2, -1], [-1, 0, -2], [1, 0, -2]],
    [[0, 2, -1], [-2, 1, 0], [-1, 0, -2]],
    [[0, -2, 1], [0, -2, -1], [-2, -1, 0]],
    [[0, -2, 1], [1, 0, 2], [2, -1, 0]],
    [[0, -2, 1], [-1, 0, 2], [1, 0, 2]],
    [[0, -2, 1], [2, -1, 0], [0, -2, -1]],
    [[0, -2, 1], [-2, -1, 0], [-1, 0, 2]],
    [[0, -2, -1], [1, 0, -2], [-1, 0, -2]],
    [[0, -2, -1], [-1, 0, -2], [-2, -1, 0]],
    [[0, -2, -1], [2, -1, 0], [1, 0, -2]],
    [[1, 0, 2], [2, 1, 0], [2, -1, 0]],
    [[-1, 0, 2], [-2, -1, 0], [-2, 1, 0]],
    [[1, 0, -2], [2, -1, 0], [2, 1, 0]],
    [[-1, 0, -2], [-2, 1, 0], [-2, -1, 0]],
];

pub const FACE_COUNT: usize = 20;

/// A triangle of the icosahedron, vertices in mesh order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
}

/// Where a ray crossed a face.
///
/// `beta` and `gamma` weight vertices `b` and `c`; `a` carries the rest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceHit {
    pub face: usize,
    pub t: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Resolve the coded face table.
pub fn faces() -> [Face; FACE_COUNT] {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let du = 1.0 / (phi * phi + 1.0).sqrt();
    let dv = phi * du;
    let decode = |code: [i8; 3]| {
        DVec3::from_array(code.map(|c| match c {
            1 => du,
            -1 => -du,
            2 => dv,
            -2 => -dv,
            _ => 0.0,
        }))
    };
    FACE_CODES.map(|[a, b, c]| Face {
        a: decode(a),
        b: decode(b),
        c: decode(c),
    })
}

impl Face {
    /// Intersect the ray from the origin along `dir` with this face.
    ///
    /// Accepts the hit when the plane distance is positive and inside the
    /// sphere and the barycentric weights lie within `tolerance` of the
    /// triangle. The weights are computed without normalising the face normal.
    #[inline]
    pub fn intersect(&self, index: usize, dir: DVec3, tolerance: f64) -> Option<FaceHit> {
        let e0 = self.b - self.a;
        let e1 = self.a - self.c;
        let n = e1.cross(e0);

        let dt = 1.0 / n.dot(dir);
        let e2 = self.a * dt;
        let i = dir.cross(e2);

        let beta = i.dot(e1);
        let gamma = i.dot(e0);
        let t = n.dot(e2);

        let hit = t * t < dir.length()
            && t > 0.0
            && beta >= -tolerance
            && gamma >= -tolerance
            && beta + gamma <= 1.0 + tolerance * 2.0;
        hit.then_some(FaceHit {
            face: index,
            t,
            beta,
            gamma,
        })
    }

    /// Point on the face plane with the given weights for `b` and `c`.
    pub fn sample(&self, beta: f64, gamma: f64) -> DVec3 {
        self.a * (1.0 - beta - gamma) + self.b * beta + self.c * gamma
    }
}

/// First face, in table order, whose test accepts `dir`.
pub fn first_hit(faces: &[Face; FACE_COUNT], dir: DVec3, tolerance: f64) -> Option<FaceHit> {
    faces
        .iter()
        .enumerate()
        .find_map(|(i, face)| face.intersect(i, dir, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_vertices_on_unit_sphere() {
        for face in faces() {
            for v in [face.a, face.b, face.c] {
                assert!((v.length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_faces_are_congruent() {
        let faces = faces();
        let edge = (faces[0].b - faces[0].a).length();
        for face in faces {
            for (p, q) in [(face.a, face.b), (face.b, face.c), (face.c, face.a)] {
                assert!(((p - q).length() - edge).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_barycentric_weights_recovered() {
        let faces = faces();
        let face = faces[0];
        let dir = face.sample(0.3, 0.1).normalize();
        let hit = face.intersect(0, dir, 0.0).unwrap();
        assert!((hit.beta - 0.3).abs() < 1e-9);
        assert!((hit.gamma - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_every_direction_hits_a_face() {
        let faces = faces();
        let mut rng = Xoshiro256StarStar::seed_from_u64(20);
        for _ in 0..20_000 {
            let dir = DVec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if dir.length_squared() < 1e-6 {
                continue;
            }
            assert!(first_hit(&faces, dir.normalize(), 0.0).is_some(), "{dir:?}");
        }
    }

    #[test]
    fn test_opposite_face_rejected() {
        let faces = faces();
        let centre = faces[0].sample(1.0 / 3.0, 1.0 / 3.0).normalize();
        assert!(faces[0].intersect(0, -centre, 0.0).is_none());
    }
}
