//! Static quadtree over zone bounds for frustum queries.
//!
//! The tree splits the lon/lat rectangle of the globe into quadrants down to
//! a fixed depth. Zones live in the leaf whose half-open bounds contain the
//! centre of the zone's box. Each node carries a render-space [`Aabb`]
//! spanning its four corners and centre projected onto the sphere, grown to
//! enclose its children's boxes and the boxes of the zones below it. A zone
//! whose own box meets the frustum is therefore never culled at a node.
//!
//! Queries start at the root's children. The root box spans pole to pole
//! and would pass almost any frustum.

use crate::frustum::{Aabb, Frustum};
use crate::geo::{GeoCoord, geo_to_point};
use crate::zone::{GeoBounds, GisZone, ZoneKey};

pub const DEFAULT_QUADTREE_DEPTH: u8 = 4;

/// A zone cell with its precomputed extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneData {
    pub zone: GisZone,
    pub bounds: GeoBounds,
    pub center: GeoCoord,
}

impl ZoneData {
    pub fn new(zone: GisZone) -> Self {
        let bounds = zone.bounds();
        Self {
            zone,
            bounds,
            center: bounds.center(),
        }
    }

    pub fn key(&self) -> ZoneKey {
        self.zone.key()
    }
}

/// Render-space box around a geographic rectangle on a sphere of `radius`.
pub fn node_aabb(bounds: &GeoBounds, radius: f32) -> Aabb {
    let center = bounds.center();
    let samples = [
        GeoCoord::new(bounds.lat_max, bounds.lon_min),
        GeoCoord::new(bounds.lat_min, bounds.lon_min),
        GeoCoord::new(bounds.lat_max, bounds.lon_max),
        GeoCoord::new(bounds.lat_min, bounds.lon_max),
        center,
    ];
    let points = samples.map(|c| geo_to_point(c, f64::from(radius)).as_vec3());
    let mut aabb = Aabb::new(points[0], points[0]);
    for p in &points[1..] {
        aabb.expand_by_point(*p);
    }
    aabb
}

#[derive(Debug)]
struct QuadNode {
    bounds: GeoBounds,
    aabb: Aabb,
    children: Option<Box<[QuadNode; 4]>>,
    zones: Vec<usize>,
}

impl QuadNode {
    fn new(bounds: GeoBounds, radius: f32, depth: u8, max_depth: u8) -> Self {
        let children = (depth < max_depth).then(|| {
            Box::new(
                bounds
                    .quadrants()
                    .map(|q| QuadNode::new(q, radius, depth + 1, max_depth)),
            )
        });
        let mut aabb = node_aabb(&bounds, radius);
        if let Some(children) = &children {
            for child in children.iter() {
                aabb.merge(&child.aabb);
            }
        }
        Self {
            bounds,
            aabb,
            children,
            zones: Vec::new(),
        }
    }

    /// Place `slot` in the leaf containing `center`, growing every box on
    /// the way down to enclose `zone_box`.
    fn insert(&mut self, slot: usize, center: GeoCoord, zone_box: &Aabb) -> bool {
        let placed = match &mut self.children {
            None => {
                self.zones.push(slot);
                true
            }
            Some(children) => children
                .iter_mut()
                .find(|child| child.bounds.contains(center))
                .is_some_and(|child| child.insert(slot, center, zone_box)),
        };
        if placed {
            self.aabb.merge(zone_box);
        }
        placed
    }

    fn query(&self, frustum: &Frustum, zone_boxes: &[Aabb], out: &mut Vec<usize>) {
        if !frustum.intersects_aabb(&self.aabb) {
            return;
        }
        self.collect(frustum, zone_boxes, out);
    }

    fn collect(&self, frustum: &Frustum, zone_boxes: &[Aabb], out: &mut Vec<usize>) {
        match &self.children {
            None => out.extend(self.zones.iter().copied().filter(|&slot| {
                zone_boxes
                    .get(slot)
                    .is_some_and(|aabb| frustum.intersects_aabb(aabb))
            })),
            Some(children) => {
                for child in children.iter() {
                    child.query(frustum, zone_boxes, out);
                }
            }
        }
    }

    fn count(&self) -> (usize, usize) {
        match &self.children {
            None => (1, 1),
            Some(children) => children.iter().fold((1, 0), |(nodes, leaves), child| {
                let (n, l) = child.count();
                (nodes + n, leaves + l)
            }),
        }
    }
}

/// Quadtree of [`ZoneData`], built once and read-only afterwards.
#[derive(Debug)]
pub struct QuadTree {
    root: QuadNode,
    zones: Vec<ZoneData>,
    zone_boxes: Vec<Aabb>,
    radius: f32,
    max_depth: u8,
}

impl QuadTree {
    /// Empty tree for a sphere of `radius`, split `max_depth` times.
    pub fn new(radius: f32, max_depth: u8) -> Self {
        Self {
            root: QuadNode::new(GeoBounds::WORLD, radius, 0, max_depth),
            zones: Vec::new(),
            zone_boxes: Vec::new(),
            radius,
            max_depth,
        }
    }

    /// Tree holding every zone cell of the globe.
    pub fn with_all_zones(radius: f32, max_depth: u8) -> Self {
        let mut tree = Self::new(radius, max_depth);
        for zone in GisZone::all() {
            tree.insert(ZoneData::new(zone));
        }
        let (nodes, leaves) = tree.root.count();
        tracing::debug!(
            zones = tree.zones.len(),
            nodes,
            leaves,
            max_depth,
            "zone quadtree built"
        );
        tree
    }

    /// Store a zone in the leaf containing its centre. Returns `false`, and
    /// keeps nothing, when the centre lies outside the globe rectangle.
    pub fn insert(&mut self, zone: ZoneData) -> bool {
        let slot = self.zones.len();
        let zone_box = node_aabb(&zone.bounds, self.radius);
        if !self.root.insert(slot, zone.center, &zone_box) {
            tracing::warn!(zone = %zone.zone, "zone centre outside the quadtree");
            return false;
        }
        self.zones.push(zone);
        self.zone_boxes.push(zone_box);
        true
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn zones(&self) -> &[ZoneData] {
        &self.zones
    }

    /// Total node count, leaves included.
    pub fn node_count(&self) -> usize {
        self.root.count().0
    }

    pub fn leaf_count(&self) -> usize {
        self.root.count().1
    }

    /// Zones whose own box intersects the frustum. Subtrees are skipped
    /// when their node box misses, which never drops such a zone.
    pub fn query(&self, frustum: &Frustum) -> Vec<&ZoneData> {
        let mut slots = Vec::new();
        self.root.collect(frustum, &self.zone_boxes, &mut slots);
        slots.iter().filter_map(|&i| self.zones.get(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn looking_at(eye: Vec3, target: Vec3, far: f32) -> Frustum {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 1.0, far);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn test_node_counts() {
        let tree = QuadTree::new(1000.0, 4);
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.node_count(), 1 + 4 + 16 + 64 + 256);
        assert_eq!(QuadTree::new(1.0, 0).leaf_count(), 1);
    }

    #[test]
    fn test_every_zone_inserted() {
        let tree = QuadTree::with_all_zones(1000.0, DEFAULT_QUADTREE_DEPTH);
        assert_eq!(tree.zones().len(), 288);
    }

    #[test]
    fn test_outside_centre_rejected() {
        let mut tree = QuadTree::new(1.0, 2);
        let mut zone = ZoneData::new(GisZone::new(7, 1).unwrap());
        zone.center = GeoCoord::new(0.0, 180.0);
        assert!(!tree.insert(zone));
        assert!(tree.zones().is_empty());
    }

    #[test]
    fn test_query_sees_facing_side() {
        let tree = QuadTree::with_all_zones(1000.0, DEFAULT_QUADTREE_DEPTH);
        let frustum = looking_at(Vec3::new(3000.0, 0.0, 0.0), Vec3::ZERO, 2500.0);
        let visible = tree.query(&frustum);
        assert!(!visible.is_empty());
        assert!(visible.iter().any(|z| z.zone == GisZone::new(7, 1).unwrap()));
        assert!(!visible.iter().any(|z| z.zone == GisZone::new(7, 13).unwrap()));
    }

    #[test]
    fn test_query_empty_when_looking_away() {
        let tree = QuadTree::with_all_zones(1000.0, DEFAULT_QUADTREE_DEPTH);
        let frustum = looking_at(Vec3::new(3000.0, 0.0, 0.0), Vec3::new(6000.0, 0.0, 0.0), 10_000.0);
        assert!(tree.query(&frustum).is_empty());
    }

    fn encloses(outer: &Aabb, inner: &Aabb) -> bool {
        outer.min.cmple(inner.min).all() && outer.max.cmpge(inner.max).all()
    }

    fn assert_boxes_nest(node: &QuadNode, zone_boxes: &[Aabb]) {
        for slot in &node.zones {
            assert!(encloses(&node.aabb, &zone_boxes[*slot]));
        }
        if let Some(children) = &node.children {
            for child in children.iter() {
                assert!(encloses(&node.aabb, &child.aabb));
                assert_boxes_nest(child, zone_boxes);
            }
        }
    }

    #[test]
    fn test_node_boxes_enclose_children_and_zones() {
        for depth in [1, 2, DEFAULT_QUADTREE_DEPTH] {
            let tree = QuadTree::with_all_zones(1000.0, depth);
            assert_boxes_nest(&tree.root, &tree.zone_boxes);
        }
    }

    #[test]
    fn test_hemisphere_box_reaches_equator_extremes() {
        // The (lat 0..90, lon -180..0) quadrant samples only reach z = 0.707R,
        // but the equatorial zones under it sit at z = R.
        let tree = QuadTree::with_all_zones(1000.0, 2);
        let children = tree.root.children.as_ref().unwrap();
        let quadrant = children
            .iter()
            .find(|c| c.bounds.lat_min == 0.0 && c.bounds.lon_max == 0.0)
            .unwrap();
        assert!(quadrant.aabb.max.z > 999.0);
    }

    #[test]
    fn test_node_aabb_spans_samples() {
        let bounds = GeoBounds {
            lon_min: 0.0,
            lon_max: 90.0,
            lat_min: 0.0,
            lat_max: 90.0,
        };
        let aabb = node_aabb(&bounds, 10.0);
        assert!((aabb.max.x - 10.0).abs() < 1e-4);
        assert!((aabb.max.y - 10.0).abs() < 1e-4);
        assert!((aabb.min.z + 10.0).abs() < 1e-4);
    }
}
