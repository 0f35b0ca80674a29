//! Trip planner - budget-driven destination recommendations
//!
//! This library provides the city catalog and search, distance and transport
//! estimation, the budget recommendation engine, exchange rates and the JSON
//! API that serves them.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod recommendation;
pub mod transport;
pub mod trip_detail;
pub mod web;

// Re-export core types for public API
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use catalog::{CityCatalog, CitySearch, search_cities};
pub use config::TravelPlannerConfig;
pub use currency::{ExchangeRateService, HttpRateSource, RateSource, convert_currency};
pub use error::PlannerError;
pub use models::{BudgetBreakdown, City, CurrencyCode, Recommendation, Tier, TransportOption};
pub use planner::{TripPlan, TripPlanner, TripRequest};
pub use recommendation::{RecommendationEngine, RecommendationPreferences, SurpriseTrip};
pub use transport::{MockTransportProvider, TransportProvider, TransportQuery, estimate_distance};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
