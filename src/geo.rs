//! Geographic primitives: a lat/lon coordinate and the great-circle distance
//! between two of them.

use std::fmt::Display;

/// Mean Earth radius in meters, matching the constant used by the reference
/// distance formula this crate's route-length calculations are built on.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A point on the Earth's surface, in degrees.
///
/// Equality is exact numeric equality: two coordinates parsed from the same
/// input document, or round-tripped through the snapshot codec, compare
/// equal bit-for-bit.
#[derive(Debug, Default, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance to `other`, in meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_METERS * c
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
