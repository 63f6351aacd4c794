/// Response cache for repeated identical searches
///
/// Injected into the pipeline as a collaborator; the scoring core never sees
/// it. Keys are built by the pipeline from the cleaned theme and the effective
/// result limit. Entries expire after a fixed TTL and the map never grows past
/// its capacity (oldest insertion is evicted first).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::pipeline::SearchResponse;

/// Cache of finished search responses.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Option<SearchResponse>;
    fn put(&self, key: String, response: SearchResponse);
}

struct Entry<V> {
    inserted_at: Instant,
    value: V,
}

/// In-memory TTL cache.
pub struct TtlCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        TtlCache {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.capacity)
    }

    /// A live (non-expired) value for `key`.
    pub fn lookup(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock();
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted_at.elapsed() < ttl);

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            Entry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for TtlCache<SearchResponse> {
    fn get(&self, key: &str) -> Option<SearchResponse> {
        self.lookup(key)
    }

    fn put(&self, key: String, response: SearchResponse) {
        self.insert(key, response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("père".to_string(), "response".to_string());
        assert_eq!(cache.lookup("père").as_deref(), Some("response"));
        assert_eq!(cache.lookup("mère"), None);
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache: TtlCache<String> = TtlCache::new(Duration::ZERO, 8);
        cache.insert("k".to_string(), "v".to_string());
        assert_eq!(cache.lookup("k"), None);
    }

    #[test]
    fn test_expired_entries_are_evicted_on_insert() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::ZERO, 8);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a".to_string(), 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b".to_string(), 2);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("c".to_string(), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup("a"), None);
        assert_eq!(cache.lookup("b"), Some(2));
        assert_eq!(cache.lookup("c"), Some(3));
    }

    #[test]
    fn test_overwrite_same_key_does_not_evict() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.insert("b".to_string(), 3);
        assert_eq!(cache.lookup("a"), Some(1));
        assert_eq!(cache.lookup("b"), Some(3));
    }
}
