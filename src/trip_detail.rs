//! Destination detail: attractions, a suggested itinerary and local costs

use serde::Serialize;

use crate::models::{City, Tier};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub name: String,
    pub description: String,
    pub category: String,
    pub rating: f64,
    pub estimated_time: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryItem {
    pub time: &'static str,
    pub activity: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub activities: Vec<ItineraryItem>,
}

/// Typical per-day spend at a destination
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalDailyCosts {
    pub accommodation: f64,
    pub food: f64,
    pub transport: f64,
    pub activities: f64,
}

impl LocalDailyCosts {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.accommodation + self.food + self.transport + self.activities
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOfLiving {
    pub tier: Tier,
    pub daily_costs: LocalDailyCosts,
    pub best_time_to_visit: &'static [&'static str],
    pub tags: &'static [&'static str],
}

const NEW_YORK: CostOfLiving = CostOfLiving {
    tier: Tier::Luxury,
    daily_costs: LocalDailyCosts {
        accommodation: 200.0,
        food: 80.0,
        transport: 30.0,
        activities: 100.0,
    },
    best_time_to_visit: &["April", "May", "September", "October"],
    tags: &["Urban", "Culture", "Shopping", "Food"],
};

const BANGKOK: CostOfLiving = CostOfLiving {
    tier: Tier::Budget,
    daily_costs: LocalDailyCosts {
        accommodation: 40.0,
        food: 15.0,
        transport: 5.0,
        activities: 20.0,
    },
    best_time_to_visit: &["November", "December", "January", "February"],
    tags: &["Culture", "Food", "Temples", "Nightlife"],
};

const PARIS: CostOfLiving = CostOfLiving {
    tier: Tier::Luxury,
    daily_costs: LocalDailyCosts {
        accommodation: 150.0,
        food: 60.0,
        transport: 20.0,
        activities: 80.0,
    },
    best_time_to_visit: &["April", "May", "September", "October"],
    tags: &["Romance", "Culture", "Art", "Food"],
};

const DEFAULT_COST_OF_LIVING: CostOfLiving = CostOfLiving {
    tier: Tier::Moderate,
    daily_costs: LocalDailyCosts {
        accommodation: 100.0,
        food: 40.0,
        transport: 15.0,
        activities: 50.0,
    },
    best_time_to_visit: &["Spring", "Fall"],
    tags: &["Travel", "Explore"],
};

const MIN_SUGGESTED_DAYS: u32 = 3;

/// Cost profile for a city name, falling back to a moderate default
#[must_use]
pub fn cost_of_living(city_name: &str) -> &'static CostOfLiving {
    match city_name {
        "New York" => &NEW_YORK,
        "Bangkok" => &BANGKOK,
        "Paris" => &PARIS,
        _ => &DEFAULT_COST_OF_LIVING,
    }
}

/// How many days `budget` covers at the city's daily costs, never under three
#[must_use]
pub fn suggested_duration(budget: f64, city_name: &str) -> u32 {
    let daily_total = cost_of_living(city_name).daily_costs.total();
    let days = (budget / daily_total).floor();
    if days.is_finite() && days > f64::from(MIN_SUGGESTED_DAYS) {
        // Saturating float-to-int cast
        days as u32
    } else {
        MIN_SUGGESTED_DAYS
    }
}

#[must_use]
pub fn attractions(city: &City) -> Vec<Attraction> {
    let attraction = |suffix: &str,
                      description: &str,
                      category: &str,
                      rating: f64,
                      estimated_time: &str,
                      price: &str| Attraction {
        name: format!("{} {}", city.name, suffix),
        description: description.to_string(),
        category: category.to_string(),
        rating,
        estimated_time: estimated_time.to_string(),
        price: price.to_string(),
    };

    vec![
        attraction(
            "Historical Museum",
            "Explore the rich history and cultural heritage of the city through fascinating exhibits and artifacts.",
            "Culture",
            4.5,
            "2-3 hours",
            "$15",
        ),
        attraction(
            "Central Park",
            "A beautiful urban park perfect for relaxation, picnics, and outdoor activities.",
            "Nature",
            4.8,
            "1-4 hours",
            "Free",
        ),
        attraction(
            "Cathedral",
            "An architectural masterpiece showcasing stunning religious art and design.",
            "Architecture",
            4.6,
            "1-2 hours",
            "$10",
        ),
        attraction(
            "Market Square",
            "Vibrant local market with traditional food, crafts, and cultural experiences.",
            "Shopping & Food",
            4.7,
            "2-3 hours",
            "Free entry",
        ),
    ]
}

#[must_use]
pub fn suggested_itinerary() -> Vec<ItineraryDay> {
    let day = |day: u32, items: [(&'static str, &'static str); 5]| ItineraryDay {
        day,
        activities: items
            .into_iter()
            .map(|(time, activity)| ItineraryItem { time, activity })
            .collect(),
    };

    vec![
        day(
            1,
            [
                ("09:00", "Arrival and Hotel Check-in"),
                ("11:00", "Visit Historical Museum"),
                ("14:00", "Lunch at Local Restaurant"),
                ("16:00", "Explore Central Park"),
                ("19:00", "Welcome Dinner"),
            ],
        ),
        day(
            2,
            [
                ("09:00", "Cathedral Visit"),
                ("11:30", "Walking Tour"),
                ("13:30", "Lunch at Market Square"),
                ("15:00", "Shopping and Local Experiences"),
                ("19:00", "Dinner and Cultural Show"),
            ],
        ),
    ]
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetail {
    pub city: City,
    pub attractions: Vec<Attraction>,
    pub itinerary: Vec<ItineraryDay>,
    pub cost_of_living: CostOfLiving,
    /// Only present when a budget was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_duration: Option<u32>,
}

impl TripDetail {
    #[must_use]
    pub fn for_city(city: &City, budget: Option<f64>) -> Self {
        Self {
            city: city.clone(),
            attractions: attractions(city),
            itinerary: suggested_itinerary(),
            cost_of_living: *cost_of_living(&city.name),
            suggested_duration: budget.map(|budget| suggested_duration(budget, &city.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CityCatalog;
    use rstest::rstest;

    #[rstest]
    #[case("New York", 410.0, Tier::Luxury)]
    #[case("Bangkok", 80.0, Tier::Budget)]
    #[case("Paris", 310.0, Tier::Luxury)]
    #[case("Lisbon", 205.0, Tier::Moderate)]
    fn test_cost_profiles(#[case] city: &str, #[case] daily_total: f64, #[case] tier: Tier) {
        let profile = cost_of_living(city);
        assert_eq!(profile.daily_costs.total(), daily_total);
        assert_eq!(profile.tier, tier);
    }

    #[rstest]
    #[case(4100.0, "New York", 10)]
    #[case(800.0, "Bangkok", 10)]
    #[case(100.0, "Paris", 3)]
    #[case(0.0, "Rome", 3)]
    #[case(1000.0, "Rome", 4)]
    fn test_suggested_duration(#[case] budget: f64, #[case] city: &str, #[case] days: u32) {
        assert_eq!(suggested_duration(budget, city), days);
    }

    #[test]
    fn test_attractions_named_after_city() {
        let catalog = CityCatalog::builtin().unwrap();
        let rome = catalog.require("ROM-IT").unwrap();

        let names: Vec<String> = attractions(rome).into_iter().map(|a| a.name).collect();
        assert_eq!(
            names,
            [
                "Rome Historical Museum",
                "Rome Central Park",
                "Rome Cathedral",
                "Rome Market Square"
            ]
        );
    }

    #[test]
    fn test_trip_detail() {
        let catalog = CityCatalog::builtin().unwrap();
        let paris = catalog.require("PAR-FR").unwrap();

        let detail = TripDetail::for_city(paris, Some(3100.0));
        assert_eq!(detail.itinerary.len(), 2);
        assert_eq!(detail.itinerary[0].activities[0].time, "09:00");
        assert_eq!(detail.cost_of_living.best_time_to_visit[0], "April");
        assert_eq!(detail.suggested_duration, Some(10));

        let json = serde_json::to_value(TripDetail::for_city(paris, None)).unwrap();
        assert!(json.get("suggestedDuration").is_none());
        assert_eq!(json["costOfLiving"]["tier"], "LUXURY");
    }
}
