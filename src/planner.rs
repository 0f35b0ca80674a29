//! Trip planning entry point
//!
//! [`TripPlanner`] owns the catalog, the caches and the collaborators, and
//! exposes the operations the API layer calls.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use crate::cache::TtlCache;
use crate::catalog::{CityCatalog, CitySearch};
use crate::config::{PlannerConfig, TravelPlannerConfig};
use crate::currency::{ExchangeRateService, HttpRateSource, Rates, convert_currency};
use crate::models::{City, CurrencyCode, Recommendation, TransportOption};
use crate::recommendation::{
    RecommendationEngine, RecommendationPreferences, SurpriseTrip, SurpriseTripPlanner,
};
use crate::transport::{MockTransportProvider, TransportProvider, TransportQuery};
use crate::trip_detail::TripDetail;
use crate::{PlannerError, Result};

/// Parse a `YYYY-MM-DD` departure date
pub fn parse_departure_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PlannerError::validation("Please select a departure date"));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PlannerError::validation(format!("Invalid departure date '{value}'")))
}

/// Parse a budget field. Blank means not given; anything else must be a
/// number.
pub fn parse_budget(value: Option<&str>) -> Result<Option<f64>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| PlannerError::validation("Please enter a valid budget amount")),
    }
}

/// A trip planning form submission
#[derive(Debug, Clone, Default)]
pub struct TripRequest {
    /// Departure city id
    pub from: Option<String>,
    /// Destination city id, ignored in surprise mode
    pub to: Option<String>,
    pub budget: Option<f64>,
    pub currency: CurrencyCode,
    pub departure_date: Option<NaiveDate>,
    pub return_trip: bool,
    pub surprise: bool,
}

impl TripRequest {
    /// Checks run before any planning work, first failure wins
    pub fn validate(&self) -> Result<()> {
        match self.budget {
            Some(budget) if budget.is_finite() && budget > 0.0 => {}
            _ => return Err(PlannerError::validation("Please enter a valid budget amount")),
        }
        if is_blank(self.from.as_deref()) {
            return Err(PlannerError::validation("Please select a departure city"));
        }
        if !self.surprise && is_blank(self.to.as_deref()) {
            return Err(PlannerError::validation(
                "Please select a destination city or enable surprise mode",
            ));
        }
        if self.departure_date.is_none() {
            return Err(PlannerError::validation("Please select a departure date"));
        }
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Result of planning a trip
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TripPlan {
    #[serde(rename_all = "camelCase")]
    Transport {
        from: City,
        to: City,
        transport_options: Vec<TransportOption>,
    },
    Surprise(SurpriseTrip),
}

pub struct TripPlanner {
    catalog: Arc<CityCatalog>,
    search: CitySearch,
    transport: Arc<dyn TransportProvider>,
    engine: RecommendationEngine,
    surprise: SurpriseTripPlanner,
    rates: ExchangeRateService,
    settings: PlannerConfig,
}

impl TripPlanner {
    #[must_use]
    pub fn new(
        catalog: Arc<CityCatalog>,
        transport: Arc<dyn TransportProvider>,
        rates: ExchangeRateService,
        settings: PlannerConfig,
        cache_ttl: Duration,
    ) -> Self {
        let engine = RecommendationEngine::new(catalog.clone(), transport.clone())
            .with_transport_share(settings.transport_share)
            .with_max_results(settings.max_results);
        let surprise = SurpriseTripPlanner::new(
            catalog.clone(),
            transport.clone(),
            StdRng::seed_from_u64(rand::random()),
        );

        Self {
            search: CitySearch::with_ttl(catalog.clone(), cache_ttl),
            catalog,
            transport,
            engine,
            surprise,
            rates,
            settings,
        }
    }

    /// Planner with the bundled catalog, generated transport and the HTTP
    /// rate source
    pub fn from_config(config: &TravelPlannerConfig) -> Result<Self> {
        let catalog = Arc::new(CityCatalog::builtin()?);
        let rates = ExchangeRateService::new(
            Box::new(HttpRateSource::new(&config.exchange)?),
            TtlCache::new(config.cache.ttl()),
        );

        Ok(Self::new(
            catalog,
            Arc::new(MockTransportProvider::from_entropy()),
            rates,
            config.planner.clone(),
            config.cache.ttl(),
        ))
    }

    /// Reseed the surprise destination picker
    #[must_use]
    pub fn with_surprise_seed(mut self, seed: u64) -> Self {
        self.surprise =
            SurpriseTripPlanner::seeded(self.catalog.clone(), self.transport.clone(), seed);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    /// Currency used when a request names none
    pub fn default_currency(&self) -> Result<CurrencyCode> {
        self.settings.currency()
    }

    pub fn search_cities(&self, query: &str) -> Vec<City> {
        self.search.search(query)
    }

    /// Validate a form submission, then search transport or plan a surprise
    /// trip
    pub async fn plan_trip(&self, request: &TripRequest) -> Result<TripPlan> {
        request.validate()?;

        let from = self.catalog.require(request.from.as_deref().unwrap_or_default())?;
        let budget = request.budget.unwrap_or_default();
        let departure_date = request
            .departure_date
            .ok_or_else(|| PlannerError::validation("Please select a departure date"))?;

        if request.surprise {
            let trip = self
                .surprise_trip(from, budget, request.currency.clone(), departure_date)
                .await?;
            return Ok(TripPlan::Surprise(trip));
        }

        let to = self.catalog.require(request.to.as_deref().unwrap_or_default())?;
        let transport_options = self
            .search_transport(from, to, departure_date, budget, request.currency.clone())
            .await?;

        Ok(TripPlan::Transport {
            from: from.clone(),
            to: to.clone(),
            transport_options,
        })
    }

    pub async fn search_transport(
        &self,
        from: &City,
        to: &City,
        departure_date: NaiveDate,
        budget: f64,
        currency: CurrencyCode,
    ) -> Result<Vec<TransportOption>> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(PlannerError::validation("Please enter a valid budget amount"));
        }

        let query = TransportQuery {
            from: from.clone(),
            to: to.clone(),
            departure_date,
            budget,
            currency,
        };
        let options = self.transport.search(&query).await?;
        info!(
            "Found {} transport options from {} to {}",
            options.len(),
            from.name,
            to.name
        );
        Ok(options)
    }

    /// Destinations for `budget`. Return trips plan a longer stay and leave
    /// a smaller share of the budget for transport.
    pub async fn recommend(
        &self,
        from: &City,
        budget: f64,
        return_trip: bool,
        mut preferences: RecommendationPreferences,
    ) -> Result<Vec<Recommendation>> {
        let (days, share) = if return_trip {
            (self.settings.return_days, self.settings.return_transport_share)
        } else {
            (self.settings.default_days, self.settings.transport_share)
        };

        if preferences.max_transport_budget.is_none() {
            preferences.max_transport_budget = Some(budget * share);
        }

        self.engine.recommend(from, budget, days, &preferences).await
    }

    pub async fn surprise_trip(
        &self,
        from: &City,
        budget: f64,
        currency: CurrencyCode,
        departure_date: NaiveDate,
    ) -> Result<SurpriseTrip> {
        self.surprise
            .plan(from, budget, currency, departure_date)
            .await
    }

    pub async fn exchange_rates(&self, base: &CurrencyCode) -> Result<Rates> {
        self.rates.rates(base).await
    }

    /// Convert between currencies with the current USD rates
    pub async fn convert(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }
        let rates = self.rates.rates(&CurrencyCode::usd()).await?;
        convert_currency(amount, from, to, &rates)
    }

    pub fn trip_detail(&self, city_id: &str, budget: Option<f64>) -> Result<TripDetail> {
        let city = self.catalog.require(city_id)?;
        Ok(TripDetail::for_city(city, budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::RateSource;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedRates;

    #[async_trait]
    impl RateSource for FixedRates {
        async fn fetch(&self, _base: &CurrencyCode) -> Result<Rates> {
            Ok(HashMap::from([
                ("USD".to_string(), 1.0),
                ("EUR".to_string(), 0.5),
            ]))
        }
    }

    fn planner() -> TripPlanner {
        let catalog = Arc::new(CityCatalog::builtin().unwrap());
        TripPlanner::new(
            catalog,
            Arc::new(MockTransportProvider::seeded(11)),
            ExchangeRateService::new(Box::new(FixedRates), TtlCache::new(Duration::from_secs(60))),
            PlannerConfig::default(),
            Duration::from_secs(60),
        )
        .with_surprise_seed(11)
    }

    fn request() -> TripRequest {
        TripRequest {
            from: Some("LON-UK".to_string()),
            to: Some("PAR-FR".to_string()),
            budget: Some(800.0),
            currency: CurrencyCode::usd(),
            departure_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            return_trip: false,
            surprise: false,
        }
    }

    #[test]
    fn test_validation_order() {
        let empty = TripRequest::default();
        assert_eq!(
            empty.validate().unwrap_err().user_message(),
            "Please enter a valid budget amount"
        );

        let no_from = TripRequest {
            from: Some("  ".to_string()),
            ..request()
        };
        assert_eq!(
            no_from.validate().unwrap_err().user_message(),
            "Please select a departure city"
        );

        let no_to = TripRequest {
            to: None,
            departure_date: None,
            ..request()
        };
        assert_eq!(
            no_to.validate().unwrap_err().user_message(),
            "Please select a destination city or enable surprise mode"
        );

        let surprise_no_date = TripRequest {
            to: None,
            departure_date: None,
            surprise: true,
            ..request()
        };
        assert_eq!(
            surprise_no_date.validate().unwrap_err().user_message(),
            "Please select a departure date"
        );

        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_parse_departure_date() {
        assert_eq!(
            parse_departure_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_departure_date("").is_err());
        assert!(parse_departure_date("2025-02-30").is_err());
        assert!(parse_departure_date("next tuesday").is_err());
    }

    #[test]
    fn test_parse_budget() {
        assert_eq!(parse_budget(Some("1250.5")).unwrap(), Some(1250.5));
        assert_eq!(parse_budget(Some(" 800 ")).unwrap(), Some(800.0));
        assert_eq!(parse_budget(Some("")).unwrap(), None);
        assert_eq!(parse_budget(None).unwrap(), None);

        let err = parse_budget(Some("abc")).unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid budget amount");
    }

    #[tokio::test]
    async fn test_plan_transport_trip() {
        let plan = planner().plan_trip(&request()).await.unwrap();
        let TripPlan::Transport {
            to,
            transport_options,
            ..
        } = plan
        else {
            panic!("expected a transport plan");
        };
        assert_eq!(to.id, "PAR-FR");
        assert!(!transport_options.is_empty());
        assert!(transport_options.iter().all(|o| o.price <= 800.0));
    }

    #[tokio::test]
    async fn test_plan_surprise_trip() {
        let request = TripRequest {
            to: None,
            budget: Some(1500.0),
            surprise: true,
            ..request()
        };
        let plan = planner().plan_trip(&request).await.unwrap();
        assert!(matches!(plan, TripPlan::Surprise(_)));
    }

    #[tokio::test]
    async fn test_plan_unknown_city() {
        let request = TripRequest {
            to: Some("XXX-XX".to_string()),
            ..request()
        };
        let err = planner().plan_trip(&request).await.unwrap_err();
        assert!(matches!(err, PlannerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_return_trip_caps_transport() {
        let planner = planner();
        let london = planner.catalog().require("LON-UK").unwrap().clone();

        let recommendations = planner
            .recommend(&london, 4000.0, true, RecommendationPreferences::default())
            .await
            .unwrap();
        for rec in &recommendations {
            assert!(rec.transport_options.iter().all(|o| o.price <= 1200.0));
        }
    }

    #[tokio::test]
    async fn test_convert() {
        let planner = planner();
        let eur: CurrencyCode = "EUR".parse().unwrap();
        assert_eq!(planner.convert(100.0, &CurrencyCode::usd(), &eur).await.unwrap(), 50.0);
        assert_eq!(planner.convert(10.0, &eur, &eur).await.unwrap(), 10.0);
    }

    #[test]
    fn test_trip_detail_unknown_city() {
        assert!(planner().trip_detail("BKK-TH", Some(800.0)).is_ok());
        assert!(matches!(
            planner().trip_detail("nowhere", None),
            Err(PlannerError::NotFound { .. })
        ));
    }
}
