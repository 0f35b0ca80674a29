//! City search with relevance ranking and a time-boxed result cache

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::CityCatalog;
use crate::cache::TtlCache;
use crate::models::City;

/// Queries shorter than this return nothing
pub const MIN_QUERY_LEN: usize = 2;

/// Case-insensitive search over names, countries, regions and country codes.
///
/// Matches are substrings of the city, country or region name, or an exact
/// country code. Exact name matches rank first, then name prefixes, then
/// everything else by descending population.
#[must_use]
pub fn search_cities(cities: &[City], query: &str) -> Vec<City> {
    let query = query.to_lowercase();

    let mut results: Vec<City> = cities
        .iter()
        .filter(|city| {
            city.name.to_lowercase().contains(&query)
                || city.country.to_lowercase().contains(&query)
                || city.region.to_lowercase().contains(&query)
                || city.country_code.to_lowercase() == query
        })
        .cloned()
        .collect();

    results.sort_by_key(|city| {
        let name = city.name.to_lowercase();
        let rank = if name == query {
            0
        } else if name.starts_with(&query) {
            1
        } else {
            2
        };
        (rank, Reverse(city.population))
    });

    results
}

/// Catalog search memoised per lowercased query
pub struct CitySearch {
    catalog: Arc<CityCatalog>,
    cache: TtlCache<String, Vec<City>>,
}

impl CitySearch {
    #[must_use]
    pub fn new(catalog: Arc<CityCatalog>, cache: TtlCache<String, Vec<City>>) -> Self {
        Self { catalog, cache }
    }

    /// Search with the wall-clock cache
    #[must_use]
    pub fn with_ttl(catalog: Arc<CityCatalog>, ttl: Duration) -> Self {
        Self::new(catalog, TtlCache::new(ttl))
    }

    /// Cached search. Short queries return an empty list without touching
    /// the cache.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<City> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let key = query.to_lowercase();
        if let Some(cities) = self.cache.get(&key) {
            debug!("City search cache hit for '{}'", key);
            return cities;
        }

        let cities = self.catalog.search(query);
        debug!("City search for '{}' found {} cities", key, cities.len());
        self.cache.put(key, cities.clone());
        cities
    }

    #[must_use]
    pub fn cache(&self) -> &TtlCache<String, Vec<City>> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn catalog() -> Arc<CityCatalog> {
        Arc::new(CityCatalog::builtin().unwrap())
    }

    fn names(cities: &[City]) -> Vec<&str> {
        cities.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_prefix_ranks_above_substring() {
        let results = catalog().search("lon");
        // "Barcelona" contains "lon" but only London starts with it
        assert_eq!(names(&results), vec!["London", "Barcelona"]);
    }

    #[test]
    fn test_exact_match_first() {
        let results = catalog().search("Singapore");
        assert_eq!(results[0].id, "SIN-SG");
    }

    #[test]
    fn test_country_code_is_exact_only() {
        let results = catalog().search("jp");
        assert_eq!(names(&results), vec!["Tokyo"]);
    }

    #[test]
    fn test_population_breaks_ties() {
        // both match through their country or region only
        let results = catalog().search("united");
        assert_eq!(names(&results), vec!["London", "New York", "Dubai"]);
    }

    #[test]
    fn test_region_match() {
        let results = catalog().search("catalonia");
        assert_eq!(names(&results), vec!["Barcelona"]);
    }

    #[test]
    fn test_short_query_skips_cache() {
        let search = CitySearch::with_ttl(catalog(), Duration::from_secs(3600));
        assert!(search.search("p").is_empty());
        assert!(search.search("").is_empty());
        assert!(search.cache().is_empty());
    }

    #[test]
    fn test_cache_keyed_by_lowercase_query() {
        let search = CitySearch::with_ttl(catalog(), Duration::from_secs(3600));
        let first = search.search("PAR");
        let second = search.search("par");
        assert_eq!(first, second);
        assert_eq!(search.cache().len(), 1);
    }

    #[test]
    fn test_cached_results_expire() {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(Duration::from_secs(3600), clock.clone());
        let search = CitySearch::new(catalog(), cache);

        search.search("rome");
        assert!(search.cache().get(&"rome".to_string()).is_some());

        clock.advance(Duration::from_secs(3601));
        assert!(search.cache().get(&"rome".to_string()).is_none());
        assert_eq!(names(&search.search("rome")), vec!["Rome"]);
    }

    #[test]
    fn test_distinct_queries_do_not_accumulate() {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(Duration::from_secs(3600), clock.clone());
        let search = CitySearch::new(catalog(), cache);

        for i in 0..500 {
            search.search(&format!("zz{i}"));
        }
        assert_eq!(search.cache().len(), 500);

        clock.advance(Duration::from_secs(2 * 3600));
        search.search("lon");
        search.search("par");
        assert_eq!(search.cache().len(), 2);
    }
}
