//! Budget breakdowns, cost tiers and recommendations

use serde::{Deserialize, Serialize};

use super::{City, TransportOption};

/// Coarse cost bracket chosen from the per-day budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Under 150 per day
    Budget,
    /// Under 400 per day
    Moderate,
    Luxury,
}

impl Tier {
    #[must_use]
    pub fn for_daily_budget(daily_budget: f64) -> Self {
        if daily_budget < 150.0 {
            Tier::Budget
        } else if daily_budget < 400.0 {
            Tier::Moderate
        } else {
            Tier::Luxury
        }
    }
}

/// Estimated trip cost split into its four components.
///
/// `total` is always the sum of the components; the only way to build one is
/// [`BudgetBreakdown::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetBreakdown {
    transport: f64,
    accommodation: f64,
    food: f64,
    activities: f64,
    total: f64,
}

impl BudgetBreakdown {
    #[must_use]
    pub fn new(transport: f64, accommodation: f64, food: f64, activities: f64) -> Self {
        Self {
            transport,
            accommodation,
            food,
            activities,
            total: transport + accommodation + food + activities,
        }
    }

    #[must_use]
    pub fn transport(&self) -> f64 {
        self.transport
    }

    #[must_use]
    pub fn accommodation(&self) -> f64 {
        self.accommodation
    }

    #[must_use]
    pub fn food(&self) -> f64 {
        self.food
    }

    #[must_use]
    pub fn activities(&self) -> f64 {
        self.activities
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// A ranked destination candidate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub city: City,
    pub transport_options: Vec<TransportOption>,
    pub budget_breakdown: BudgetBreakdown,
    /// How close the estimated spend is to 90% of the budget, in [0, 1]
    pub confidence: f64,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Tier::Budget)]
    #[case(149.99, Tier::Budget)]
    #[case(150.0, Tier::Moderate)]
    #[case(399.99, Tier::Moderate)]
    #[case(400.0, Tier::Luxury)]
    #[case(-20.0, Tier::Budget)]
    fn test_tier_thresholds(#[case] daily: f64, #[case] expected: Tier) {
        assert_eq!(Tier::for_daily_budget(daily), expected);
    }

    #[test]
    fn test_breakdown_total_is_sum() {
        let breakdown = BudgetBreakdown::new(120.0, 140.0, 84.0, 56.0);
        assert!((breakdown.total() - 400.0).abs() < 1e-9);
        assert_eq!(breakdown.transport(), 120.0);
    }

    #[test]
    fn test_tier_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&Tier::Moderate).unwrap(),
            "\"MODERATE\""
        );
    }
}
