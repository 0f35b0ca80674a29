//! Transport offer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CurrencyCode;

/// Mode of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
}

/// Mode-specific information attached to an offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransportDetails {
    #[serde(rename_all = "camelCase")]
    Flight {
        flight_number: String,
        aircraft: String,
        from_airport: String,
        to_airport: String,
    },
    #[serde(rename_all = "camelCase")]
    Train {
        train_number: String,
        class: String,
        from_station: String,
        to_station: String,
    },
    #[serde(rename_all = "camelCase")]
    Bus {
        bus_number: String,
        class: String,
        from_station: String,
        to_station: String,
    },
}

/// A single transport offer between two cities.
///
/// Offers have no identity; two generated offers may be field-for-field equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    #[serde(rename = "type")]
    pub mode: TransportMode,
    pub provider: String,
    pub price: f64,
    pub currency: CurrencyCode,
    /// Formatted as `"{h}h {m}m"`
    pub duration: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub details: TransportDetails,
}
