use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{Granularity, Series};

/// Identity of one fetched series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: String,
    pub granularity: Granularity,
    pub lookback_days: u32,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, granularity: Granularity, lookback_days: u32) -> Self {
        Self {
            symbol: symbol.into(),
            granularity,
            lookback_days,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.symbol, self.granularity, self.lookback_days)
    }
}

/// Thread-safe TTL cache of fetched series, so scanners in one batch
/// share a single fetch per symbol and granularity.
pub struct SeriesCache {
    data: DashMap<SeriesKey, CacheEntry>,
    ttl: Duration,
}

struct CacheEntry {
    series: Arc<Series>,
    expires_at: Instant,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a live entry. Expired entries are evicted on read.
    pub fn get(&self, key: &SeriesKey) -> Option<Arc<Series>> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(Arc::clone(&entry.series))
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    pub fn insert(&self, key: SeriesKey, series: Arc<Series>) {
        if self.ttl.is_zero() {
            return;
        }
        self.data.insert(
            key,
            CacheEntry {
                series,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop all expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    /// Number of entries, including any not yet evicted.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
