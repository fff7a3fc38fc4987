//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS-84 coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        Self::is_valid_latitude(self.latitude) && Self::is_valid_longitude(self.longitude)
    }

    pub fn is_valid_latitude(latitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude)
    }

    pub fn is_valid_longitude(longitude: f64) -> bool {
        (-180.0..=180.0).contains(&longitude)
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
///
/// Always `>= 0`; zero for identical points.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
