//! Currency codes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PlannerError;

/// Currencies offered in the planner, with their display symbol and name
pub const SUPPORTED_CURRENCIES: [(&str, &str, &str); 7] = [
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("JPY", "¥", "Japanese Yen"),
    ("AUD", "A$", "Australian Dollar"),
    ("CAD", "C$", "Canadian Dollar"),
    ("INR", "₹", "Indian Rupee"),
];

/// Three-letter upper-case currency code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_usd(&self) -> bool {
        self.0 == "USD"
    }

    /// Display symbol, falling back to the dollar sign like the planner form does
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        SUPPORTED_CURRENCIES
            .iter()
            .find(|(code, _, _)| *code == self.0)
            .map_or("$", |(_, symbol, _)| symbol)
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl FromStr for CurrencyCode {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PlannerError::validation(format!(
                "Invalid currency code '{s}'"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
