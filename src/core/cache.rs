use crate::core::clock::{Clock, SystemClock};
use crate::core::currency::RatePair;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// How long a fetched rate is trusted.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq)]
pub struct CachedRate {
    pub pair: RatePair,
    pub rate: f64,
    pub fetched_at: Instant,
}

/// In-memory rate cache keyed by directional currency pair.
///
/// Entries older than the TTL read as absent but stay in the map until the
/// next successful fetch for the same pair overwrites them.
#[derive(Clone)]
pub struct RateCache {
    inner: Arc<Mutex<HashMap<RatePair, CachedRate>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to the cache's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub async fn get(&self, pair: &RatePair) -> Option<CachedRate> {
        let cache = self.inner.lock().await;
        let Some(entry) = cache.get(pair) else {
            debug!(%pair, "Cache MISS");
            return None;
        };

        let age = self.clock.now().saturating_duration_since(entry.fetched_at);
        if age >= self.ttl {
            debug!(%pair, ?age, "Cache entry expired");
            return None;
        }

        debug!(%pair, "Cache HIT");
        Some(entry.clone())
    }

    pub async fn put(&self, pair: RatePair, rate: f64, now: Instant) {
        let mut cache = self.inner.lock().await;
        debug!(%pair, rate, "Cache PUT");
        cache.insert(
            pair.clone(),
            CachedRate {
                pair,
                rate,
                fetched_at: now,
            },
        );
    }

    pub async fn clear(&self) {
        let mut cache = self.inner.lock().await;
        cache.clear();
        debug!("Cache CLEAR");
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
