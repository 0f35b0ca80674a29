//! Destination cost model
//!
//! Per-city cost-of-living multipliers scale tier-specific base daily costs.

use crate::models::Tier;

/// Cost-of-living multipliers relative to an average city (1.0)
const CITY_COST_MULTIPLIERS: [(&str, f64); 15] = [
    ("LON-UK", 1.8),
    ("PAR-FR", 1.6),
    ("NYC-US", 2.0),
    ("TOK-JP", 1.7),
    ("SYD-AU", 1.5),
    ("DEL-IN", 0.4),
    ("DXB-AE", 1.4),
    ("SIN-SG", 1.5),
    ("IST-TR", 0.6),
    ("BCN-ES", 1.1),
    ("BER-DE", 1.2),
    ("ROM-IT", 1.3),
    ("AMS-NL", 1.4),
    ("HKG-HK", 1.6),
    ("BKK-TH", 0.5),
];

const CULTURAL: [&str; 3] = ["Bangkok", "Delhi", "Istanbul"];
const BEACH: [&str; 3] = ["Sydney", "Barcelona", "Dubai"];
const MODERN: [&str; 3] = ["Tokyo", "Singapore", "Hong Kong"];
const HISTORIC: [&str; 3] = ["Paris", "Rome", "Amsterdam"];

/// Multiplier for a city id, if the table has one
#[must_use]
pub fn cost_multiplier(city_id: &str) -> Option<f64> {
    CITY_COST_MULTIPLIERS
        .iter()
        .find(|(id, _)| *id == city_id)
        .map(|(_, multiplier)| *multiplier)
}

/// Daily spend per category, in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCosts {
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
}

impl DailyCosts {
    /// Base costs for an average city
    #[must_use]
    pub fn base(tier: Tier) -> Self {
        match tier {
            Tier::Budget => Self {
                accommodation: 50.0,
                food: 30.0,
                activities: 20.0,
            },
            Tier::Moderate => Self {
                accommodation: 150.0,
                food: 60.0,
                activities: 40.0,
            },
            Tier::Luxury => Self {
                accommodation: 300.0,
                food: 120.0,
                activities: 100.0,
            },
        }
    }

    /// Base costs scaled by the city's multiplier (1.0 when unknown)
    #[must_use]
    pub fn for_city(city_id: &str, tier: Tier) -> Self {
        Self::base(tier).scaled(cost_multiplier(city_id).unwrap_or(1.0))
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            accommodation: self.accommodation * factor,
            food: self.food * factor,
            activities: self.activities * factor,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.accommodation + self.food + self.activities
    }
}

/// Heuristic fit between spend and budget, peaking at 90% utilisation.
///
/// Clamped to `[0, 1]`. A non-positive budget scores zero.
#[must_use]
pub fn confidence(total_cost: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        return 0.0;
    }
    let utilization = total_cost / budget;
    (1.0 - (0.9 - utilization).abs()).clamp(0.0, 1.0)
}

/// Descriptive tags from the multiplier table and fixed name lists
#[must_use]
pub fn tags_for(city_id: &str, city_name: &str) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(multiplier) = cost_multiplier(city_id) {
        if multiplier < 0.8 {
            tags.push("budget-friendly");
        }
        if multiplier > 1.4 {
            tags.push("luxury");
        }
    }

    for (names, tag) in [
        (&CULTURAL, "cultural"),
        (&BEACH, "beach"),
        (&MODERN, "modern"),
        (&HISTORIC, "historic"),
    ] {
        if names.contains(&city_name) {
            tags.push(tag);
        }
    }

    tags.into_iter().map(String::from).collect()
}
