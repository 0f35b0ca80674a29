//! Great-circle distance between catalog cities

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::City;

/// Haversine distance in kilometres (Earth radius 6371 km).
///
/// Symmetric in its arguments and zero for identical coordinates.
#[must_use]
pub fn estimate_distance(from: &City, to: &City) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}
