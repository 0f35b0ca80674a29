//! Time-boxed in-memory caches
//!
//! Caches are plain values constructed once and handed to the services that
//! need them. Time comes from an injected [`Clock`] so expiry can be driven
//! by tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.start + *offset
    }
}

#[derive(Debug, Clone)]
struct StoredEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Map whose entries are only served while younger than the TTL.
///
/// Expired entries are skipped on read and dropped by the next `put`.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, StoredEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache backed by the wall clock
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Retrieves a value if it exists and has not expired.
    #[tracing::instrument(name = "query_cache", level = "debug", skip_all)]
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.lock();
        match entries.get(key) {
            Some(entry) if self.clock.now().duration_since(entry.stored_at) < self.ttl => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Stores a value, replacing whatever was there. Entries that have
    /// already expired are dropped at the same time.
    #[tracing::instrument(name = "put_cache", level = "debug", skip_all)]
    pub fn put(&self, key: K, value: V) {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
        if entries.len() < before {
            tracing::debug!("Dropped {} expired entries", before - entries.len());
        }
        entries.insert(
            key,
            StoredEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// Number of stored entries, fresh or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, StoredEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_clock(ttl_secs: u64) -> (TtlCache<String, u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_fresh_entry_is_served() {
        let (cache, clock) = cache_with_clock(3600);
        cache.put("lon".to_string(), 7);
        clock.advance(Duration::from_secs(3599));
        assert_eq!(cache.get(&"lon".to_string()), Some(7));
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let (cache, clock) = cache_with_clock(3600);
        cache.put("lon".to_string(), 7);
        clock.advance(Duration::from_secs(3600));
        assert_eq!(cache.get(&"lon".to_string()), None);
        // still stored until replaced
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_replaces_expired_entry() {
        let (cache, clock) = cache_with_clock(10);
        cache.put("usd".to_string(), 1);
        clock.advance(Duration::from_secs(11));
        cache.put("usd".to_string(), 2);
        assert_eq!(cache.get(&"usd".to_string()), Some(2));
    }

    #[test]
    fn test_put_drops_expired_entries() {
        let (cache, clock) = cache_with_clock(3600);
        for i in 0..1000 {
            cache.put(format!("query-{i}"), i);
        }
        assert_eq!(cache.len(), 1000);

        clock.advance(Duration::from_secs(2 * 3600));
        cache.put("lon".to_string(), 1);
        cache.put("par".to_string(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"lon".to_string()), Some(1));
        assert_eq!(cache.get(&"query-0".to_string()), None);
    }

    #[test]
    fn test_put_keeps_fresh_entries() {
        let (cache, clock) = cache_with_clock(60);
        cache.put("old".to_string(), 1);
        clock.advance(Duration::from_secs(30));
        cache.put("new".to_string(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"old".to_string()), Some(1));
    }

    #[test]
    fn test_missing_key() {
        let (cache, _) = cache_with_clock(10);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"nope".to_string()), None);
    }
}
