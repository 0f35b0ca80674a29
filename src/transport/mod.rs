//! Distance and transport estimation
//!
//! Offers come from a [`TransportProvider`]. The bundled
//! [`MockTransportProvider`] synthesises plausible, distance-scaled offers
//! from a seedable random source; a real data source plugs in behind the
//! same trait.

pub mod distance;
pub mod mock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::Result;
use crate::models::{City, CurrencyCode, TransportOption};

pub use distance::estimate_distance;
pub use mock::{MockTransportProvider, search_transport_options};

/// Parameters of a transport search
#[derive(Debug, Clone)]
pub struct TransportQuery {
    pub from: City,
    pub to: City,
    pub departure_date: NaiveDate,
    /// Offers priced above this are dropped
    pub budget: f64,
    pub currency: CurrencyCode,
}

/// Source of transport offers between two cities
#[async_trait]
pub trait TransportProvider: Send + Sync {
    /// Offers that fit `query.budget`, cheapest first. May be empty.
    async fn search(&self, query: &TransportQuery) -> Result<Vec<TransportOption>>;
}
