use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A GPS coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a validated coordinate pair.
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180];
    /// out-of-range values are a caller error and are never clamped.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// Check that both components are finite and within the GPS domain.
    pub fn validate(&self) -> Result<()> {
        let latitude_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let longitude_ok =
            self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);

        if latitude_ok && longitude_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to another coordinate pair in kilometres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_km(self, other)
    }
}

/// Great-circle distance between two GPS points using the haversine
/// formula. Pure and symmetric; `haversine_km(p, p)` is zero.
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().asin()
}
