//! In-memory TTL cache for resolved weather results.

use crate::models::WeatherResult;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::{Duration, Instant},
};

#[derive(Clone, Debug)]
struct CacheEntry {
    value: WeatherResult,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Process-wide weather cache keyed by normalized city name.
///
/// Entries are replaced whole and never mutated in place. An entry stops
/// being visible the moment its TTL elapses; [`purge_expired`] reclaims the
/// memory. There is no size bound.
///
/// [`purge_expired`]: WeatherCache::purge_expired
#[derive(Debug, Default)]
pub struct WeatherCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entry
    pub fn get(&self, key: &str) -> Option<WeatherResult> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop it unless a concurrent writer already replaced it
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry
    pub fn put(&self, key: impl Into<String>, value: WeatherResult, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Periodically purge expired entries on the current actix runtime
pub fn spawn_cache_sweeper(cache: Arc<WeatherCache>, every: Duration) {
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = cache.len(), "Purged expired weather entries");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn sample(city: &str, celsius: i32) -> WeatherResult {
        WeatherResult::new(city, celsius, "Clear")
    }

    #[test]
    fn test_get_returns_stored_value() {
        let cache = WeatherCache::new();
        assert!(cache.get("paris").is_none());

        cache.put("paris", sample("Paris, France", 21), Duration::from_secs(60));

        assert_eq!(cache.get("paris"), Some(sample("Paris, France", 21)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = WeatherCache::new();
        cache.put("oslo", sample("Oslo", -3), Duration::from_millis(20));

        sleep(Duration::from_millis(40));

        assert!(cache.get("oslo").is_none());
        assert!(cache.is_empty(), "expired entry should be removed on read");
    }

    #[test]
    fn test_zero_ttl_is_never_served() {
        let cache = WeatherCache::new();
        cache.put("rome", sample("Rome", 30), Duration::ZERO);
        assert!(cache.get("rome").is_none());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let cache = WeatherCache::new();
        cache.put("quito", sample("Quito", 14), Duration::from_secs(u64::MAX));

        assert_eq!(cache.get("quito"), Some(sample("Quito", 14)));
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let cache = WeatherCache::new();
        cache.put("lima", sample("Lima", 15), Duration::from_secs(60));
        cache.put("lima", sample("Lima, Peru", 17), Duration::from_secs(60));

        assert_eq!(cache.get("lima"), Some(sample("Lima, Peru", 17)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_expired() {
        let cache = WeatherCache::new();
        cache.put("a", sample("A", 1), Duration::from_millis(10));
        cache.put("b", sample("B", 2), Duration::from_millis(10));
        cache.put("c", sample("C", 3), Duration::from_secs(60));

        sleep(Duration::from_millis(30));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(WeatherCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for n in 0..100 {
                        let key = format!("city-{}", n % 10);
                        cache.put(key.clone(), sample(&key, i), Duration::from_secs(60));
                        let value = cache.get(&key).expect("entry just written");
                        assert_eq!(value.resolved_city(), key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
    }
}
