//! Coarse latitude/longitude cells and their adjacency.
//!
//! Longitude is cut into 24 bands of 15° numbered eastward from the prime
//! meridian: band 1 covers `[0, 15)`, band 13 starts at the antimeridian and
//! band 24 ends at `0`. Latitude uses the non-uniform boundaries in
//! [`LAT_DIVIDER`], mirrored, giving 12 bands numbered from south to north.
//! Bands 1 and 12 are the polar caps; every longitude cell inside a cap shares
//! one [`ZoneKey`].

use std::fmt;

use glam::DVec3;
use rustc_hash::FxHashSet;

use crate::geo::{GeoCoord, point_to_geo};

/// Width of a longitude band in degrees.
pub const LNG_DIVIDER: f64 = 15.0;

/// Number of longitude bands.
pub const LNG_BANDS: u8 = 24;

/// Latitude band boundaries for one hemisphere, in degrees from the equator.
pub const LAT_DIVIDER: [f64; 7] = [0.0, 10.0, 30.0, 50.0, 70.0, 80.0, 90.0];

/// Number of latitude bands over both hemispheres.
pub const LAT_BANDS: u8 = 12;

const HALF_LAT_BANDS: u8 = LAT_BANDS / 2;

/// One latitude/longitude cell. Both bands are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GisZone {
    pub lat_band: u8,
    pub lng_band: u8,
}

/// Geographic rectangle in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    /// The whole globe.
    pub const WORLD: GeoBounds = GeoBounds {
        lon_min: -180.0,
        lon_max: 180.0,
        lat_min: -90.0,
        lat_max: 90.0,
    };

    pub fn center(&self) -> GeoCoord {
        GeoCoord::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Half-open containment: the west and south edges are inside, the east
    /// and north edges are not.
    pub fn contains(&self, coord: GeoCoord) -> bool {
        coord.longitude >= self.lon_min
            && coord.longitude < self.lon_max
            && coord.latitude >= self.lat_min
            && coord.latitude < self.lat_max
    }

    /// Split into four quadrants: north-west, north-east, south-west,
    /// south-east.
    pub fn quadrants(&self) -> [GeoBounds; 4] {
        let lon_mid = (self.lon_min + self.lon_max) / 2.0;
        let lat_mid = (self.lat_min + self.lat_max) / 2.0;
        [
            GeoBounds {
                lon_min: self.lon_min,
                lon_max: lon_mid,
                lat_min: lat_mid,
                lat_max: self.lat_max,
            },
            GeoBounds {
                lon_min: lon_mid,
                lon_max: self.lon_max,
                lat_min: lat_mid,
                lat_max: self.lat_max,
            },
            GeoBounds {
                lon_min: self.lon_min,
                lon_max: lon_mid,
                lat_min: self.lat_min,
                lat_max: lat_mid,
            },
            GeoBounds {
                lon_min: lon_mid,
                lon_max: self.lon_max,
                lat_min: self.lat_min,
                lat_max: lat_mid,
            },
        ]
    }
}

/// Identity of a zone once the polar caps are merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneKey {
    SouthPole,
    Cell(GisZone),
    NorthPole,
}

impl GisZone {
    /// Cell with the given bands, or `None` when either is out of range.
    pub fn new(lat_band: u8, lng_band: u8) -> Option<Self> {
        ((1..=LAT_BANDS).contains(&lat_band) && (1..=LNG_BANDS).contains(&lng_band)).then_some(
            Self {
                lat_band,
                lng_band,
            },
        )
    }

    /// Cell containing a coordinate. `None` for latitudes beyond the poles
    /// and for non-finite input.
    pub fn from_geo(coord: GeoCoord) -> Option<Self> {
        let lng = coord.longitude;
        let mut lng_band = (lng / LNG_DIVIDER).floor() as i32;
        if lng >= 0.0 {
            lng_band += 1;
        } else {
            lng_band += i32::from(LNG_BANDS) + 1;
        }

        let lat = coord.latitude;
        let step = (1..LAT_DIVIDER.len()).find(|&i| lat.abs() <= LAT_DIVIDER[i])? as u8;
        let lat_band = if lat < 0.0 {
            HALF_LAT_BANDS - step + 1
        } else {
            HALF_LAT_BANDS + step
        };

        Self::new(lat_band, u8::try_from(lng_band).ok()?)
    }

    /// Cell containing the direction through a render-space point.
    pub fn from_point(point: DVec3) -> Option<Self> {
        Self::from_geo(point_to_geo(point)?)
    }

    pub fn is_polar(&self) -> bool {
        self.lat_band == 1 || self.lat_band == LAT_BANDS
    }

    pub fn key(&self) -> ZoneKey {
        if self.lat_band == 1 {
            ZoneKey::SouthPole
        } else if self.lat_band == LAT_BANDS {
            ZoneKey::NorthPole
        } else {
            ZoneKey::Cell(*self)
        }
    }

    /// Geographic extent of this single cell.
    pub fn bounds(&self) -> GeoBounds {
        let (lat_min, lat_max) = if self.lat_band > HALF_LAT_BANDS {
            let step = usize::from(self.lat_band - HALF_LAT_BANDS);
            (LAT_DIVIDER[step - 1], LAT_DIVIDER[step])
        } else {
            let step = usize::from(HALF_LAT_BANDS - self.lat_band);
            (-LAT_DIVIDER[step + 1], -LAT_DIVIDER[step])
        };

        let (lon_min, lon_max) = if self.lng_band <= LNG_BANDS / 2 {
            let lng = f64::from(self.lng_band);
            (LNG_DIVIDER * (lng - 1.0), LNG_DIVIDER * lng)
        } else {
            let lng = f64::from(LNG_BANDS - self.lng_band);
            (-(lng + 1.0) * LNG_DIVIDER, -lng * LNG_DIVIDER)
        };

        GeoBounds {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Whether two cells touch. A cell is never adjacent to itself or to a
    /// cell sharing its merged key. Polar cells touch every cell in the
    /// neighbouring band; other cells touch within one band either way,
    /// wrapping across the antimeridian.
    pub fn is_adjacent(&self, other: &GisZone) -> bool {
        if self.key() == other.key() {
            return false;
        }
        let dlat = (i16::from(self.lat_band) - i16::from(other.lat_band)).abs();
        if self.is_polar() || other.is_polar() {
            return dlat == 1;
        }
        let dlng = (i16::from(self.lng_band) - i16::from(other.lng_band)).abs();
        dlat <= 1 && (dlng <= 1 || dlng == i16::from(LNG_BANDS) - 1)
    }

    /// One representative cell for every zone adjacent to this one, in
    /// band order.
    pub fn adjacent_zones(&self) -> Vec<GisZone> {
        let lo = self.lat_band.saturating_sub(1).max(1);
        let hi = (self.lat_band + 1).min(LAT_BANDS);
        let mut seen = FxHashSet::default();
        let mut zones = Vec::new();
        for lat_band in lo..=hi {
            for lng_band in 1..=LNG_BANDS {
                let candidate = GisZone {
                    lat_band,
                    lng_band,
                };
                if self.is_adjacent(&candidate) && seen.insert(candidate.key()) {
                    zones.push(candidate);
                }
            }
        }
        zones
    }

    /// Every cell, south to north then west to east by band number.
    pub fn all() -> impl Iterator<Item = GisZone> {
        (1..=LAT_BANDS).flat_map(|lat_band| {
            (1..=LNG_BANDS).map(move |lng_band| GisZone {
                lat_band,
                lng_band,
            })
        })
    }
}

impl ZoneKey {
    pub fn is_polar(&self) -> bool {
        !matches!(self, ZoneKey::Cell(_))
    }

    /// The cells merged under this key, in longitude band order.
    pub fn cells(&self) -> impl Iterator<Item = GisZone> + use<> {
        let (lat_band, range) = match *self {
            ZoneKey::SouthPole => (1, 1..=LNG_BANDS),
            ZoneKey::NorthPole => (LAT_BANDS, 1..=LNG_BANDS),
            ZoneKey::Cell(zone) => (zone.lat_band, zone.lng_band..=zone.lng_band),
        };
        range.map(move |lng_band| GisZone {
            lat_band,
            lng_band,
        })
    }

    /// First cell under this key.
    pub fn representative(&self) -> GisZone {
        match *self {
            ZoneKey::SouthPole => GisZone {
                lat_band: 1,
                lng_band: 1,
            },
            ZoneKey::NorthPole => GisZone {
                lat_band: LAT_BANDS,
                lng_band: 1,
            },
            ZoneKey::Cell(zone) => zone,
        }
    }

    /// Geographic extent of everything under this key. Polar keys span all
    /// longitudes.
    pub fn bounds(&self) -> GeoBounds {
        let cell = self.representative().bounds();
        if self.is_polar() {
            GeoBounds {
                lon_min: -180.0,
                lon_max: 180.0,
                ..cell
            }
        } else {
            cell
        }
    }

    pub fn is_adjacent(&self, other: &ZoneKey) -> bool {
        self.representative().is_adjacent(&other.representative())
    }

    /// Adjacent keys, in band order.
    pub fn adjacent(&self) -> Vec<ZoneKey> {
        self.representative()
            .adjacent_zones()
            .iter()
            .map(GisZone::key)
            .collect()
    }
}

impl fmt::Display for GisZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat_band, self.lng_band)
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKey::SouthPole => f.write_str("south pole"),
            ZoneKey::NorthPole => f.write_str("north pole"),
            ZoneKey::Cell(zone) => zone.fmt(f),
        }
    }
}
