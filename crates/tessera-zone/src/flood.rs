//! Growing a visible set of zones outward over adjacency.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::zone::ZoneKey;

/// Visible zones reachable from `seeds`.
///
/// Seeds that fail `is_visible` are dropped. Each pass then adds every
/// visible neighbour of the zones added by the previous pass, until a pass
/// adds nothing. The predicate runs at most once per key. The result keeps
/// discovery order.
pub fn flood_visible<I, F>(seeds: I, mut is_visible: F) -> Vec<ZoneKey>
where
    I: IntoIterator<Item = ZoneKey>,
    F: FnMut(ZoneKey) -> bool,
{
    let mut checked: FxHashMap<ZoneKey, bool> = FxHashMap::default();
    let mut check = |key: ZoneKey| *checked.entry(key).or_insert_with(|| is_visible(key));

    let mut found: Vec<ZoneKey> = Vec::new();
    let mut in_found: FxHashSet<ZoneKey> = FxHashSet::default();
    for seed in seeds {
        if !in_found.contains(&seed) && check(seed) {
            in_found.insert(seed);
            found.push(seed);
        }
    }

    let mut frontier = found.clone();
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for key in &frontier {
            for neighbour in key.adjacent() {
                if in_found.contains(&neighbour) || !check(neighbour) {
                    continue;
                }
                in_found.insert(neighbour);
                next.push(neighbour);
            }
        }
        found.extend_from_slice(&next);
        frontier = next;
    }
    tracing::trace!(zones = found.len(), "visible zone flood");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::GisZone;

    fn cell(lat: u8, lng: u8) -> ZoneKey {
        ZoneKey::Cell(GisZone::new(lat, lng).unwrap())
    }

    #[test]
    fn test_invisible_seed_yields_nothing() {
        assert!(flood_visible([cell(7, 1)], |_| false).is_empty());
    }

    #[test]
    fn test_grows_within_visible_region() {
        let visible = |k: ZoneKey| match k {
            ZoneKey::Cell(z) => (6..=8).contains(&z.lat_band) && [24, 1, 2].contains(&z.lng_band),
            _ => false,
        };
        let mut zones = flood_visible([cell(7, 1)], visible);
        assert_eq!(zones[0], cell(7, 1));
        zones.sort_unstable();
        assert_eq!(zones.len(), 9);
        assert!(zones.contains(&cell(6, 24)));
    }

    #[test]
    fn test_reaches_pole_once() {
        let zones = flood_visible([cell(11, 1)], |k| match k {
            ZoneKey::NorthPole => true,
            ZoneKey::Cell(z) => z.lat_band == 11,
            ZoneKey::SouthPole => false,
        });
        assert_eq!(zones.iter().filter(|k| **k == ZoneKey::NorthPole).count(), 1);
        assert_eq!(zones.len(), 25);
    }

    #[test]
    fn test_predicate_called_once_per_key() {
        let mut calls: FxHashMap<ZoneKey, usize> = FxHashMap::default();
        flood_visible([cell(5, 5), cell(5, 5)], |k| {
            *calls.entry(k).or_default() += 1;
            true
        });
        assert!(calls.values().all(|&n| n == 1));
        assert_eq!(calls.len(), 2 + 10 * 24);
    }
}
