use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tessera_zone::{
    DEFAULT_QUADTREE_DEPTH, Frustum, GeoCoord, GisZone, QuadTree, geo_to_point, node_aabb,
};

const RADIUS: f32 = 1000.0;

/// Linear scan of every zone cell, testing each cell's own box.
fn scan_visible(frustum: &Frustum) -> Vec<GisZone> {
    GisZone::all()
        .filter(|z| frustum.intersects_aabb(&node_aabb(&z.bounds(), RADIUS)))
        .collect()
}

fn random_frustum(rng: &mut Xoshiro256StarStar) -> Frustum {
    let lat = rng.gen_range(-89.0..89.0);
    let lon = rng.gen_range(-180.0..180.0);
    let altitude = rng.gen_range(1.2..4.0);
    let eye = geo_to_point(GeoCoord::new(lat, lon), f64::from(RADIUS) * altitude).as_vec3();
    let jitter = Vec3::new(
        rng.gen_range(-300.0..300.0),
        rng.gen_range(-300.0..300.0),
        rng.gen_range(-300.0..300.0),
    );
    let fov = rng.gen_range(0.3..1.2);
    let far = rng.gen_range(500.0..6000.0);
    let view = Mat4::look_at_rh(eye, jitter, Vec3::Y);
    let proj = Mat4::perspective_rh(fov, 1.5, 1.0, far);
    Frustum::from_view_projection(&(proj * view))
}

#[test]
fn test_query_matches_linear_scan() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(4);
    for depth in [1, 2, DEFAULT_QUADTREE_DEPTH, 6] {
        let tree = QuadTree::with_all_zones(RADIUS, depth);
        for _ in 0..200 {
            let frustum = random_frustum(&mut rng);
            let mut from_tree: Vec<GisZone> = tree.query(&frustum).iter().map(|z| z.zone).collect();
            let mut from_scan = scan_visible(&frustum);
            from_tree.sort_unstable();
            from_scan.sort_unstable();
            assert_eq!(from_tree, from_scan);
        }
    }
}

#[test]
fn test_results_are_zone_subset() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(9);
    let tree = QuadTree::with_all_zones(RADIUS, DEFAULT_QUADTREE_DEPTH);
    for _ in 0..100 {
        let frustum = random_frustum(&mut rng);
        let visible = tree.query(&frustum);
        let mut zones: Vec<GisZone> = visible.iter().map(|z| z.zone).collect();
        zones.sort_unstable();
        zones.dedup();
        assert_eq!(zones.len(), visible.len());
    }
}

#[test]
fn test_low_orbit_over_southern_ocean() {
    // Close to the surface the node boxes of the lat/lon quadrants are far
    // smaller than the zone boxes beneath them.
    let eye = geo_to_point(GeoCoord::new(-82.69, -58.54), f64::from(RADIUS) * 1.28).as_vec3();
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(0.8, 1.5, 1.0, 3000.0);
    let frustum = Frustum::from_view_projection(&(proj * view));
    let tree = QuadTree::with_all_zones(RADIUS, DEFAULT_QUADTREE_DEPTH);
    let from_tree: Vec<GisZone> = tree.query(&frustum).iter().map(|z| z.zone).collect();
    let from_scan = scan_visible(&frustum);
    assert!(!from_scan.is_empty());
    for zone in &from_scan {
        assert!(from_tree.contains(zone), "{zone} dropped");
    }
    assert_eq!(from_tree.len(), from_scan.len());
}
