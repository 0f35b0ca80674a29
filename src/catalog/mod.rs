//! City catalog
//!
//! Static reference list of cities, loaded once from the bundled table and
//! only ever read afterwards.

pub mod search;

use std::collections::HashSet;

use tracing::info;

use crate::models::City;
use crate::{PlannerError, Result};

pub use search::{CitySearch, MIN_QUERY_LEN, search_cities};

const BUILTIN_CITIES: &str = include_str!("cities.json");

/// Read-only set of known cities
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    /// Load the bundled city table
    pub fn builtin() -> Result<Self> {
        let cities: Vec<City> = serde_json::from_str(BUILTIN_CITIES)
            .map_err(|e| PlannerError::general(format!("Failed to parse city table: {e}")))?;
        let catalog = Self::from_cities(cities)?;
        info!("Loaded {} cities into the catalog", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from an explicit list; ids must be unique
    pub fn from_cities(cities: Vec<City>) -> Result<Self> {
        let mut seen = HashSet::new();
        for city in &cities {
            if !seen.insert(city.id.as_str()) {
                return Err(PlannerError::validation(format!(
                    "Duplicate city id '{}'",
                    city.id
                )));
            }
        }
        Ok(Self { cities })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.id == id)
    }

    /// Like [`CityCatalog::get`] but unknown ids are an error
    pub fn require(&self, id: &str) -> Result<&City> {
        self.get(id).ok_or_else(|| PlannerError::not_found(id))
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Uncached search over the catalog
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<City> {
        search_cities(&self.cities, query)
    }
}
