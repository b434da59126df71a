//! Conversions between geographic coordinates and render-space points.
//!
//! Render space is right-handed with `+Y` through the north pole and the
//! prime meridian on `+X`. East longitudes lie toward `−Z`. Mesh records
//! store positions with the opposite `z` sign, see [`mesh_to_render`].

use std::fmt;

use glam::{DVec3, Vec3};

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoCoord {
    /// Latitude in degrees. Range: \[-90, 90\].
    pub latitude: f64,
    /// Longitude in degrees. Range: \[-180, 180\].
    pub longitude: f64,
}

impl GeoCoord {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir,
        )
    }
}

/// Point on a sphere of `radius` at the given coordinate.
pub fn geo_to_point(coord: GeoCoord, radius: f64) -> DVec3 {
    let lat = coord.latitude.to_radians();
    let lon = coord.longitude.to_radians();
    DVec3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.sin(),
        -radius * lat.cos() * lon.sin(),
    )
}

/// Coordinate of the direction through `point`. `None` for the zero vector
/// and for non-finite input.
pub fn point_to_geo(point: DVec3) -> Option<GeoCoord> {
    let n = point.try_normalize()?;
    Some(GeoCoord {
        latitude: n.y.clamp(-1.0, 1.0).asin().to_degrees(),
        longitude: (-n.z).atan2(n.x).to_degrees(),
    })
}

/// Flip a stored mesh position into render space.
#[inline]
pub fn mesh_to_render(position: Vec3) -> Vec3 {
    Vec3::new(position.x, position.y, -position.z)
}
