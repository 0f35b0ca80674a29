//! Surprise trips: a randomly chosen destination that fits the budget

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::catalog::CityCatalog;
use crate::models::{BudgetBreakdown, City, CurrencyCode, TransportOption};
use crate::transport::{TransportProvider, TransportQuery};
use crate::{PlannerError, Result};

/// Destinations a surprise trip can land on
const SURPRISE_DESTINATIONS: [&str; 3] = ["BCN-ES", "PRG-CZ", "AMS-NL"];

const SURPRISE_ACTIVITIES: [&str; 4] = [
    "City sightseeing tour",
    "Local food tasting",
    "Museum visits",
    "Cultural experiences",
];

const ACCOMMODATION_SHARE: f64 = 0.5;
const ACTIVITIES_SHARE: f64 = 0.3;
const FOOD_SHARE: f64 = 0.2;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurpriseTrip {
    pub destination: City,
    pub transport_options: Vec<TransportOption>,
    pub activities: Vec<String>,
    /// Spends the whole budget: cheapest transport, then the remainder
    /// split between accommodation, activities and food
    pub estimated_costs: BudgetBreakdown,
}

pub struct SurpriseTripPlanner {
    catalog: Arc<CityCatalog>,
    transport: Arc<dyn TransportProvider>,
    rng: Mutex<StdRng>,
}

impl SurpriseTripPlanner {
    #[must_use]
    pub fn new(
        catalog: Arc<CityCatalog>,
        transport: Arc<dyn TransportProvider>,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            transport,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn seeded(
        catalog: Arc<CityCatalog>,
        transport: Arc<dyn TransportProvider>,
        seed: u64,
    ) -> Self {
        Self::new(catalog, transport, StdRng::seed_from_u64(seed))
    }

    fn pick_destination(&self, from: &City) -> Result<City> {
        let choices: Vec<&City> = SURPRISE_DESTINATIONS
            .iter()
            .filter(|id| **id != from.id)
            .filter_map(|id| self.catalog.get(id))
            .collect();

        if choices.is_empty() {
            return Err(PlannerError::general("No surprise destinations available"));
        }

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.random_range(0..choices.len())
        };
        Ok(choices[index].clone())
    }

    /// Plan a trip to a random shortlisted destination other than `from`
    #[tracing::instrument(skip(self, from), fields(origin = %from.id))]
    pub async fn plan(
        &self,
        from: &City,
        budget: f64,
        currency: CurrencyCode,
        departure_date: NaiveDate,
    ) -> Result<SurpriseTrip> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(PlannerError::validation("Please enter a valid budget amount"));
        }

        let destination = self.pick_destination(from)?;
        let query = TransportQuery {
            from: from.clone(),
            to: destination.clone(),
            departure_date,
            budget,
            currency,
        };
        let transport_options = self.transport.search(&query).await?;

        let Some(cheapest) = transport_options.first() else {
            return Err(PlannerError::NoAffordableTransport {
                from: from.name.clone(),
                to: destination.name.clone(),
                budget,
            });
        };

        let remaining = budget - cheapest.price;
        let estimated_costs = BudgetBreakdown::new(
            cheapest.price,
            remaining * ACCOMMODATION_SHARE,
            remaining * FOOD_SHARE,
            remaining * ACTIVITIES_SHARE,
        );

        info!(
            "Surprise trip from {} to {} with {} transport options",
            from.name,
            destination.name,
            transport_options.len()
        );

        Ok(SurpriseTrip {
            destination,
            transport_options,
            activities: SURPRISE_ACTIVITIES.iter().map(|a| a.to_string()).collect(),
            estimated_costs,
        })
    }
}
