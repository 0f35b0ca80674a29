//! City model for catalog entries

use serde::{Deserialize, Serialize};

/// A catalog city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Unique identifier, e.g. `LON-UK`
    pub id: String,
    /// Display name
    pub name: String,
    pub country: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country_code: String,
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub population: u64,
}
