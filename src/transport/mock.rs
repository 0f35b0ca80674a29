//! Synthetic transport offers
//!
//! Prices are drawn from distance brackets and durations assume an 800 km/h
//! average speed. The randomness is injected so that a seeded generator
//! always yields the same offers.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

use super::{TransportProvider, TransportQuery, estimate_distance};
use crate::Result;
use crate::models::{City, CurrencyCode, TransportDetails, TransportMode, TransportOption};

const AIRLINES: [&str; 4] = ["Budget Air", "Sky Express", "Global Wings", "City Hopper"];
const TRAIN_OPERATOR: &str = "EuroRail Express";
const BUS_OPERATOR: &str = "EuroLines";

const AVERAGE_SPEED_KMH: f64 = 800.0;

const SHORT_HAUL: (u32, u32) = (50, 200);
const MEDIUM_HAUL: (u32, u32) = (150, 500);
const LONG_HAUL: (u32, u32) = (400, 1200);

/// Trains run below this distance
const TRAIN_MAX_KM: f64 = 1000.0;
/// Buses run below this distance
const BUS_MAX_KM: f64 = 500.0;

const TRAIN_DURATION_FACTOR: f64 = 0.7;
const TRAIN_PRICE_FACTOR: f64 = 0.5;
const BUS_DURATION_FACTOR: f64 = 0.4;
const BUS_PRICE_FACTOR: f64 = 0.3;

const FIRST_FLIGHT_HOUR: i64 = 7;
const FLIGHT_SPACING_HOURS: i64 = 3;
const TRAIN_HOUR: i64 = 8;
const BUS_HOUR: i64 = 9;

/// Half-open price range `[min, max)` for a distance
#[must_use]
pub fn price_bracket(distance_km: f64) -> (u32, u32) {
    if distance_km < 1000.0 {
        SHORT_HAUL
    } else if distance_km < 3000.0 {
        MEDIUM_HAUL
    } else {
        LONG_HAUL
    }
}

fn mock_price<R: RngExt>(rng: &mut R, distance_km: f64) -> f64 {
    let (min, max) = price_bracket(distance_km);
    f64::from(rng.random_range(min..max))
}

/// Whole hours and minutes of a journey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelTime {
    pub hours: i64,
    pub minutes: i64,
}

impl TravelTime {
    #[must_use]
    pub fn for_distance(distance_km: f64) -> Self {
        let minute_km = AVERAGE_SPEED_KMH / 60.0;
        Self {
            hours: (distance_km / AVERAGE_SPEED_KMH).floor() as i64,
            minutes: ((distance_km % AVERAGE_SPEED_KMH) / minute_km).floor() as i64,
        }
    }

    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::hours(self.hours) + Duration::minutes(self.minutes)
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

fn departure_at(date: NaiveDate, hours_after_midnight: i64) -> DateTime<Utc> {
    (date.and_time(NaiveTime::default()) + Duration::hours(hours_after_midnight)).and_utc()
}

fn service_number<R: RngExt>(rng: &mut R, prefix: &str) -> String {
    format!("{prefix}{}", rng.random_range(100..1000_u32))
}

struct Leg<'a> {
    from: &'a City,
    to: &'a City,
    currency: &'a CurrencyCode,
}

impl Leg<'_> {
    fn offer(
        &self,
        mode: TransportMode,
        provider: &str,
        price: f64,
        travel_time: TravelTime,
        departure: DateTime<Utc>,
        details: TransportDetails,
    ) -> TransportOption {
        TransportOption {
            mode,
            provider: provider.to_string(),
            price,
            currency: self.currency.clone(),
            duration: travel_time.to_string(),
            departure,
            arrival: departure + travel_time.as_duration(),
            details,
        }
    }

    fn flights<R: RngExt>(
        &self,
        rng: &mut R,
        distance_km: f64,
        date: NaiveDate,
        budget: f64,
    ) -> Vec<TransportOption> {
        let count = rng.random_range(3..=5);
        let travel_time = TravelTime::for_distance(distance_km);
        let mut flights = Vec::new();

        for slot in 0..count {
            let price = mock_price(rng, distance_km);
            if price > budget {
                continue;
            }

            let airline = AIRLINES[rng.random_range(0..AIRLINES.len())];
            let carrier: String = airline.chars().take(2).collect();
            let departure = departure_at(date, FIRST_FLIGHT_HOUR + slot * FLIGHT_SPACING_HOURS);

            flights.push(self.offer(
                TransportMode::Flight,
                airline,
                price,
                travel_time,
                departure,
                TransportDetails::Flight {
                    flight_number: service_number(rng, &carrier),
                    aircraft: "Boeing 737".to_string(),
                    from_airport: format!("{} International", self.from.name),
                    to_airport: format!("{} International", self.to.name),
                },
            ));
        }

        flights
    }

    fn train<R: RngExt>(
        &self,
        rng: &mut R,
        distance_km: f64,
        date: NaiveDate,
        budget: f64,
    ) -> Option<TransportOption> {
        let price = mock_price(rng, distance_km * TRAIN_PRICE_FACTOR);
        if price > budget {
            return None;
        }

        Some(self.offer(
            TransportMode::Train,
            TRAIN_OPERATOR,
            price,
            TravelTime::for_distance(distance_km * TRAIN_DURATION_FACTOR),
            departure_at(date, TRAIN_HOUR),
            TransportDetails::Train {
                train_number: service_number(rng, "TR"),
                class: "First Class".to_string(),
                from_station: format!("{} Central", self.from.name),
                to_station: format!("{} Central", self.to.name),
            },
        ))
    }

    fn bus<R: RngExt>(
        &self,
        rng: &mut R,
        distance_km: f64,
        date: NaiveDate,
        budget: f64,
    ) -> Option<TransportOption> {
        let price = mock_price(rng, distance_km * BUS_PRICE_FACTOR);
        if price > budget {
            return None;
        }

        Some(self.offer(
            TransportMode::Bus,
            BUS_OPERATOR,
            price,
            TravelTime::for_distance(distance_km * BUS_DURATION_FACTOR),
            departure_at(date, BUS_HOUR),
            TransportDetails::Bus {
                bus_number: service_number(rng, "BUS"),
                class: "Standard".to_string(),
                from_station: format!("{} Bus Terminal", self.from.name),
                to_station: format!("{} Bus Terminal", self.to.name),
            },
        ))
    }
}

/// Generate offers from `from` to `to` within `budget`, cheapest first.
///
/// Three to five flights are attempted, spaced three hours apart from 07:00;
/// a train is added under 1000 km and a bus under 500 km. Anything priced
/// above the budget is dropped without replacement, so the result may be
/// empty.
pub fn search_transport_options<R: RngExt>(
    rng: &mut R,
    from: &City,
    to: &City,
    departure_date: NaiveDate,
    budget: f64,
    currency: &CurrencyCode,
) -> Vec<TransportOption> {
    let distance_km = estimate_distance(from, to);
    let leg = Leg { from, to, currency };

    let mut options = leg.flights(rng, distance_km, departure_date, budget);

    if distance_km < TRAIN_MAX_KM {
        options.extend(leg.train(rng, distance_km, departure_date, budget));
    }
    if distance_km < BUS_MAX_KM {
        options.extend(leg.bus(rng, distance_km, departure_date, budget));
    }

    options.sort_by(|a, b| a.price.total_cmp(&b.price));

    debug!(
        "Generated {} transport options {} -> {} ({:.0} km, budget {})",
        options.len(),
        from.id,
        to.id,
        distance_km,
        budget
    );

    options
}

/// Transport provider backed by a seedable generator
pub struct MockTransportProvider {
    rng: Mutex<StdRng>,
}

impl MockTransportProvider {
    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Deterministic provider: equal seeds give equal offer sequences
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }
}

#[async_trait]
impl TransportProvider for MockTransportProvider {
    #[tracing::instrument(name = "mock_transport_search", level = "debug", skip_all, fields(from = %query.from.id, to = %query.to.id))]
    async fn search(&self, query: &TransportQuery) -> Result<Vec<TransportOption>> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(search_transport_options(
            &mut *rng,
            &query.from,
            &query.to,
            query.departure_date,
            query.budget,
            &query.currency,
        ))
    }
}
