//! Budget recommendation engine
//!
//! Ranks catalog destinations by how well an estimated trip (cheapest
//! transport plus tiered daily costs) fits a budget.

pub mod costs;
pub mod surprise;

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalog::CityCatalog;
use crate::models::{BudgetBreakdown, City, CurrencyCode, Recommendation, Tier};
use crate::transport::{TransportProvider, TransportQuery};
use crate::{PlannerError, Result};

pub use costs::{DailyCosts, confidence, cost_multiplier, tags_for};
pub use surprise::{SurpriseTrip, SurpriseTripPlanner};

/// Default share of the budget allowed for transport
pub const DEFAULT_TRANSPORT_SHARE: f64 = 0.4;
/// Default number of recommendations returned
pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Days between today and the default departure
const DEFAULT_LEAD_DAYS: u64 = 30;

/// Optional filters for a recommendation request
#[derive(Debug, Clone, Default)]
pub struct RecommendationPreferences {
    /// Transport price cap; defaults to `budget * transport_share`
    pub max_transport_budget: Option<f64>,
    /// Only consider cities in these regions (empty means all)
    pub preferred_regions: Vec<String>,
    /// City ids never to recommend
    pub excluded_cities: Vec<String>,
    /// Defaults to 30 days from today
    pub departure_date: Option<NaiveDate>,
}

/// Scores every catalog city against a budget
pub struct RecommendationEngine {
    catalog: Arc<CityCatalog>,
    transport: Arc<dyn TransportProvider>,
    transport_share: f64,
    max_results: usize,
}

impl RecommendationEngine {
    #[must_use]
    pub fn new(catalog: Arc<CityCatalog>, transport: Arc<dyn TransportProvider>) -> Self {
        Self {
            catalog,
            transport,
            transport_share: DEFAULT_TRANSPORT_SHARE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_transport_share(mut self, share: f64) -> Self {
        self.transport_share = share;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Up to `max_results` affordable destinations, best confidence first.
    ///
    /// A candidate whose transport lookup fails is logged and skipped; the
    /// remaining candidates are still evaluated.
    #[tracing::instrument(skip(self, from, preferences), fields(origin = %from.id))]
    pub async fn recommend(
        &self,
        from: &City,
        budget: f64,
        days: u32,
        preferences: &RecommendationPreferences,
    ) -> Result<Vec<Recommendation>> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(PlannerError::validation("Please enter a valid budget amount"));
        }
        if days == 0 {
            return Err(PlannerError::validation("Trip length must be at least one day"));
        }

        let transport_budget = preferences
            .max_transport_budget
            .unwrap_or(budget * self.transport_share);
        let departure_date = preferences
            .departure_date
            .unwrap_or_else(default_departure_date);

        let candidates: Vec<&City> = self
            .catalog
            .iter()
            .filter(|city| city.id != from.id)
            .filter(|city| !preferences.excluded_cities.contains(&city.id))
            .filter(|city| {
                preferences.preferred_regions.is_empty()
                    || preferences.preferred_regions.contains(&city.region)
            })
            .collect();

        debug!(
            "Evaluating {} candidates with transport budget {:.2}",
            candidates.len(),
            transport_budget
        );

        let evaluations = candidates.into_iter().map(|city| async move {
            let query = TransportQuery {
                from: from.clone(),
                to: city.clone(),
                departure_date,
                budget: transport_budget,
                currency: CurrencyCode::usd(),
            };
            (city, self.evaluate(query, budget, days).await)
        });

        let mut recommendations = Vec::new();
        for (city, outcome) in join_all(evaluations).await {
            match outcome {
                Ok(Some(recommendation)) => recommendations.push(recommendation),
                Ok(None) => {}
                Err(e) => warn!("Error processing city {}: {}", city.name, e),
            }
        }

        recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        recommendations.truncate(self.max_results);

        info!(
            "Recommending {} destinations from {} for budget {:.2} over {} days",
            recommendations.len(),
            from.name,
            budget,
            days
        );

        Ok(recommendations)
    }

    /// `None` when the candidate has no transport or is over budget
    async fn evaluate(
        &self,
        query: TransportQuery,
        budget: f64,
        days: u32,
    ) -> Result<Option<Recommendation>> {
        let transport_options = self.transport.search(&query).await?;
        let Some(cheapest) = transport_options.first() else {
            debug!("No affordable transport to {}", query.to.id);
            return Ok(None);
        };

        let breakdown = estimate_trip_cost(&query.to, cheapest.price, budget, days);
        if breakdown.total() > budget {
            debug!(
                "{} over budget: {:.2} > {:.2}",
                query.to.id,
                breakdown.total(),
                budget
            );
            return Ok(None);
        }

        Ok(Some(Recommendation {
            confidence: confidence(breakdown.total(), budget),
            tags: tags_for(&query.to.id, &query.to.name),
            city: query.to,
            transport_options,
            budget_breakdown: breakdown,
        }))
    }
}

/// Cost of a `days`-long stay at `destination` after paying `transport_price`.
///
/// The tier comes from what is left of the budget per day once transport is
/// paid for.
#[must_use]
pub fn estimate_trip_cost(
    destination: &City,
    transport_price: f64,
    budget: f64,
    days: u32,
) -> BudgetBreakdown {
    let days = f64::from(days);
    let tier = Tier::for_daily_budget((budget - transport_price) / days);
    let daily = DailyCosts::for_city(&destination.id, tier);

    BudgetBreakdown::new(
        transport_price,
        daily.accommodation * days,
        daily.food * days,
        daily.activities * days,
    )
}

/// Thirty days from today
#[must_use]
pub fn default_departure_date() -> NaiveDate {
    let today = Utc::now().date_naive();
    today
        .checked_add_days(Days::new(DEFAULT_LEAD_DAYS))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportOption;
    use crate::transport::MockTransportProvider;
    use async_trait::async_trait;

    fn catalog() -> Arc<CityCatalog> {
        Arc::new(CityCatalog::builtin().unwrap())
    }

    fn engine(seed: u64) -> RecommendationEngine {
        RecommendationEngine::new(catalog(), Arc::new(MockTransportProvider::seeded(seed)))
    }

    fn prefs() -> RecommendationPreferences {
        RecommendationPreferences {
            departure_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            ..Default::default()
        }
    }

    /// Fails for one destination, delegates everything else
    struct FlakyProvider {
        failing: &'static str,
        inner: MockTransportProvider,
    }

    #[async_trait]
    impl TransportProvider for FlakyProvider {
        async fn search(&self, query: &TransportQuery) -> Result<Vec<TransportOption>> {
            if query.to.id == self.failing {
                return Err(PlannerError::api("upstream timeout"));
            }
            self.inner.search(query).await
        }
    }

    #[test]
    fn test_delhi_breakdown() {
        let catalog = catalog();
        let delhi = catalog.require("DEL-IN").unwrap();

        let breakdown = estimate_trip_cost(delhi, 400.0, 1000.0, 7);
        // (1000 - 400) / 7 per day is the BUDGET tier
        assert!((breakdown.accommodation() - 140.0).abs() < 1e-9);
        assert!((breakdown.food() - 84.0).abs() < 1e-9);
        assert!((breakdown.activities() - 56.0).abs() < 1e-9);
        assert!((breakdown.total() - 680.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_uses_remaining_daily_budget() {
        let catalog = catalog();
        let prague = catalog.require("PRG-CZ").unwrap();

        // 3000 - 200 = 2800 over 7 days = 400/day, LUXURY
        let luxury = estimate_trip_cost(prague, 200.0, 3000.0, 7);
        assert!((luxury.accommodation() - 2100.0).abs() < 1e-9);

        // 3000 - 250 = 2750 over 7 days < 400/day, MODERATE
        let moderate = estimate_trip_cost(prague, 250.0, 3000.0, 7);
        assert!((moderate.accommodation() - 1050.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_results_bounded_and_sorted() {
        let catalog = catalog();
        let london = catalog.require("LON-UK").unwrap();

        for seed in 0..10 {
            let recommendations = engine(seed)
                .recommend(london, 2500.0, 7, &prefs())
                .await
                .unwrap();

            assert!(recommendations.len() <= 5);
            assert!(
                recommendations
                    .windows(2)
                    .all(|w| w[0].confidence >= w[1].confidence)
            );
            for rec in &recommendations {
                let b = &rec.budget_breakdown;
                assert!(b.total() <= 2500.0);
                let sum = b.transport() + b.accommodation() + b.food() + b.activities();
                assert!((b.total() - sum).abs() < 1e-6);
                assert!((0.0..=1.0).contains(&rec.confidence));
                assert_ne!(rec.city.id, "LON-UK");
                assert_eq!(b.transport(), rec.transport_options[0].price);
            }
        }
    }

    #[tokio::test]
    async fn test_exclusions_and_regions() {
        let catalog = catalog();
        let london = catalog.require("LON-UK").unwrap();

        let preferences = RecommendationPreferences {
            excluded_cities: vec!["PAR-FR".to_string()],
            ..prefs()
        };
        let recommendations = engine(1)
            .with_max_results(20)
            .recommend(london, 3000.0, 7, &preferences)
            .await
            .unwrap();
        assert!(recommendations.iter().all(|r| r.city.id != "PAR-FR"));

        let preferences = RecommendationPreferences {
            preferred_regions: vec!["Catalonia".to_string(), "Lazio".to_string()],
            ..prefs()
        };
        // at 2500 Barcelona always lands in the MODERATE tier and fits
        let recommendations = engine(1)
            .recommend(london, 2500.0, 7, &preferences)
            .await
            .unwrap();
        assert!(!recommendations.is_empty());
        assert!(
            recommendations
                .iter()
                .all(|r| ["BCN-ES", "ROM-IT"].contains(&r.city.id.as_str()))
        );
    }

    #[tokio::test]
    async fn test_transport_cap_applied() {
        let catalog = catalog();
        let london = catalog.require("LON-UK").unwrap();

        let recommendations = engine(4)
            .with_max_results(20)
            .recommend(london, 5000.0, 7, &prefs())
            .await
            .unwrap();
        for rec in &recommendations {
            assert!(rec.transport_options.iter().all(|o| o.price <= 2000.0));
        }

        let capped = RecommendationPreferences {
            max_transport_budget: Some(120.0),
            ..prefs()
        };
        let recommendations = engine(4)
            .with_max_results(20)
            .recommend(london, 5000.0, 7, &capped)
            .await
            .unwrap();
        for rec in &recommendations {
            assert!(rec.transport_options.iter().all(|o| o.price <= 120.0));
        }
    }

    #[tokio::test]
    async fn test_failing_candidate_is_skipped() {
        let catalog = catalog();
        let london = catalog.require("LON-UK").unwrap().clone();
        let provider = FlakyProvider {
            failing: "PAR-FR",
            inner: MockTransportProvider::seeded(9),
        };
        let engine = RecommendationEngine::new(catalog, Arc::new(provider)).with_max_results(20);

        let recommendations = engine
            .recommend(&london, 3000.0, 7, &prefs())
            .await
            .unwrap();
        assert!(!recommendations.is_empty());
        assert!(recommendations.iter().all(|r| r.city.id != "PAR-FR"));
    }

    #[tokio::test]
    async fn test_tiny_budget_recommends_nothing() {
        let catalog = catalog();
        let london = catalog.require("LON-UK").unwrap();
        let recommendations = engine(2).recommend(london, 100.0, 7, &prefs()).await.unwrap();
        assert!(recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let catalog = catalog();
        let london = catalog.require("LON-UK").unwrap();
        let engine = engine(0);

        for budget in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                engine.recommend(london, budget, 7, &prefs()).await,
                Err(PlannerError::Validation { .. })
            ));
        }
        assert!(matches!(
            engine.recommend(london, 1000.0, 0, &prefs()).await,
            Err(PlannerError::Validation { .. })
        ));
    }
}
