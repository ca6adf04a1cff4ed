use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::classifier::RandomForest;
use crate::types::TradingStyle;

type ModelKey = (String, TradingStyle);

struct CacheEntry {
    forest: Arc<RandomForest>,
    expires_at: Instant,
}

/// Thread-safe TTL cache of trained forests keyed by (instrument, style).
pub struct ModelCache {
    data: DashMap<ModelKey, CacheEntry>,
    ttl: Duration,
}

impl ModelCache {
    /// Create a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a forest if present and not expired.
    pub fn get(&self, instrument: &str, style: TradingStyle) -> Option<Arc<RandomForest>> {
        let key = (instrument.to_string(), style);
        let entry = self.data.get(&key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.forest.clone())
        } else {
            drop(entry);
            self.data.remove(&key);
            None
        }
    }

    /// Store a forest, replacing any previous one for the key.
    pub fn insert(&self, instrument: &str, style: TradingStyle, forest: Arc<RandomForest>) {
        self.data.insert(
            (instrument.to_string(), style),
            CacheEntry {
                forest,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every cached forest for an instrument. Returns how many were removed.
    pub fn invalidate(&self, instrument: &str) -> usize {
        let mut removed = 0;
        self.data.retain(|(symbol, _), _| {
            let keep = symbol != instrument;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Remove all expired entries. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.data.retain(|_, entry| {
            let keep = entry.expires_at > now;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries (including expired).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;

    fn forest() -> Arc<RandomForest> {
        let features = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let config = ClassifierConfig { trees: 3, seed: 1 };
        Arc::new(RandomForest::fit(&features, &[0, 0, 1, 1], &config))
    }

    #[test]
    fn test_cache_basic() {
        let cache = ModelCache::new(Duration::from_secs(60));
        cache.insert("BTC-USD", TradingStyle::Fast, forest());

        assert!(cache.get("BTC-USD", TradingStyle::Fast).is_some());
        assert!(cache.get("BTC-USD", TradingStyle::Slow).is_none());
        assert!(cache.get("ETH-USD", TradingStyle::Fast).is_none());
    }

    #[test]
    fn test_cache_expiration() {
        let cache = ModelCache::new(Duration::from_millis(10));
        cache.insert("AAPL", TradingStyle::Slow, forest());
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get("AAPL", TradingStyle::Slow).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_removes_all_styles() {
        let cache = ModelCache::new(Duration::from_secs(60));
        cache.insert("AAPL", TradingStyle::Fast, forest());
        cache.insert("AAPL", TradingStyle::Slow, forest());
        cache.insert("MSFT", TradingStyle::Fast, forest());

        assert_eq!(cache.invalidate("AAPL"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("MSFT", TradingStyle::Fast).is_some());
        assert_eq!(cache.invalidate("AAPL"), 0);
    }

    #[test]
    fn test_cache_cleanup() {
        let cache = ModelCache::new(Duration::from_millis(10));
        cache.insert("EURUSD=X", TradingStyle::Fast, forest());
        cache.insert("USDCAD=X", TradingStyle::Slow, forest());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.cleanup(), 0);
    }

    #[test]
    fn test_cleanup_keeps_live_entries() {
        let cache = ModelCache::new(Duration::from_secs(60));
        cache.insert("AAPL", TradingStyle::Fast, forest());
        assert_eq!(cache.cleanup(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_while_inserting() {
        let cache = Arc::new(ModelCache::new(Duration::from_secs(60)));
        for i in 0..50 {
            cache.insert(&format!("SYM{i}"), TradingStyle::Fast, forest());
        }

        let writer = {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 50..200 {
                    cache.insert(&format!("SYM{i}"), TradingStyle::Fast, forest());
                }
            })
        };
        let mut removed = 0;
        for i in 0..50 {
            removed += cache.invalidate(&format!("SYM{i}"));
        }
        writer.join().unwrap();

        assert_eq!(removed, 50);
        assert_eq!(cache.len(), 150);
    }

    #[test]
    fn test_cache_overwrite_shares_forest() {
        let cache = ModelCache::new(Duration::from_secs(60));
        let first = forest();
        cache.insert("GLD", TradingStyle::Slow, first.clone());
        cache.insert("GLD", TradingStyle::Slow, forest());

        assert_eq!(cache.len(), 1);
        let cached = cache.get("GLD", TradingStyle::Slow).unwrap();
        assert!(!Arc::ptr_eq(&cached, &first));
    }
}
