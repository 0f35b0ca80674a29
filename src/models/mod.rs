//! Data models for the trip planner
//!
//! This module contains the plain records exchanged between the catalog, the
//! transport estimator and the recommendation engine:
//! - City: catalog entries with coordinates and metadata
//! - Transport: generated transport offers
//! - Budget: cost breakdowns, tiers and recommendations
//! - Currency: validated currency codes

pub mod budget;
pub mod city;
pub mod currency;
pub mod transport;

// Re-export all public types for convenient access
pub use budget::{BudgetBreakdown, Recommendation, Tier};
pub use city::City;
pub use currency::CurrencyCode;
pub use transport::{TransportDetails, TransportMode, TransportOption};
