//! Rate lookup policy: identity, cache, live provider, then static fallback

use crate::core::cache::RateCache;
use crate::core::currency::{CurrencyCode, CurrencyRateProvider, RatePair};
use crate::core::error::{FxError, ProviderError};
use crate::core::fallback::FallbackTable;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RateResolver {
    provider: Arc<dyn CurrencyRateProvider>,
    cache: RateCache,
    fallback: FallbackTable,
    timeout: Duration,
}

impl RateResolver {
    pub fn new(
        provider: Arc<dyn CurrencyRateProvider>,
        cache: RateCache,
        fallback: FallbackTable,
    ) -> Self {
        Self {
            provider,
            cache,
            fallback,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Upper bound on a single provider call. An elapsed timeout counts as a
    /// provider failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Returns how many units of `to` one unit of `from` buys.
    ///
    /// Fallback rates are returned as-is and never cached, so live rates take
    /// over again as soon as the provider recovers.
    #[instrument(name = "ResolveRate", skip(self), fields(from = %from, to = %to))]
    pub async fn resolve(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FxError> {
        let pair = RatePair::new(from.clone(), to.clone());
        if pair.is_identity() {
            return Ok(1.0);
        }

        if let Some(cached) = self.cache.get(&pair).await {
            return Ok(cached.rate);
        }

        match self.fetch_live(&pair).await {
            Ok(rate) => {
                debug!(%pair, rate, "Fetched live rate");
                self.cache.put(pair, rate, self.cache.now()).await;
                Ok(rate)
            }
            Err(e) => {
                warn!(%pair, error = %e, "Currency provider failed");
                match self.fallback.get(&pair) {
                    Some(rate) => {
                        info!(%pair, rate, "Using fallback rate");
                        Ok(rate)
                    }
                    None => Err(FxError::rate_unavailable(pair)),
                }
            }
        }
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    async fn fetch_live(&self, pair: &RatePair) -> Result<f64, ProviderError> {
        let rate = tokio::time::timeout(self.timeout, self.provider.get_rate(&pair.from, &pair.to))
            .await
            .map_err(|_| ProviderError::Timeout {
                pair: pair.clone(),
                elapsed: self.timeout,
            })??;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(ProviderError::InvalidRate {
                pair: pair.clone(),
                value: rate.to_string(),
            });
        }
        Ok(rate)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::cache::DEFAULT_CACHE_TTL;
    use crate::core::clock::ManualClock;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that answers with a scripted rate and counts its calls.
    /// `None` makes the next calls fail.
    pub(crate) struct MockRateProvider {
        rate: Mutex<Option<f64>>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockRateProvider {
        pub(crate) fn returning(rate: Option<f64>) -> Self {
            Self {
                rate: Mutex::new(rate),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn slow(rate: f64, delay: Duration) -> Self {
            Self {
                rate: Mutex::new(Some(rate)),
                delay: Some(delay),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn set_rate(&self, rate: Option<f64>) {
            *self.rate.lock().unwrap() = rate;
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CurrencyRateProvider for MockRateProvider {
        async fn get_rate(
            &self,
            from: &CurrencyCode,
            to: &CurrencyCode,
        ) -> Result<f64, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let rate = *self.rate.lock().unwrap();
            rate.ok_or_else(|| ProviderError::MissingRate {
                pair: RatePair::new(from.clone(), to.clone()),
            })
        }
    }

    pub(crate) fn code(code: &str) -> CurrencyCode {
        CurrencyCode::parse(code).unwrap()
    }

    fn resolver_with(provider: Arc<MockRateProvider>) -> (RateResolver, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = RateCache::with_clock(DEFAULT_CACHE_TTL, clock.clone());
        let resolver = RateResolver::new(provider, cache, FallbackTable::default());
        (resolver, clock)
    }

    #[tokio::test]
    async fn test_identity_pair_skips_provider() {
        let provider = Arc::new(MockRateProvider::returning(Some(3.65)));
        let (resolver, _clock) = resolver_with(provider.clone());

        for c in ["USD", "ILS", "EUR", "JPY"] {
            assert_eq!(resolver.resolve(&code(c), &code(c)).await.unwrap(), 1.0);
        }
        assert_eq!(provider.calls(), 0);
        assert!(resolver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_second_resolve_within_ttl_is_cached() {
        let provider = Arc::new(MockRateProvider::returning(Some(0.92)));
        let (resolver, clock) = resolver_with(provider.clone());

        let first = resolver.resolve(&code("USD"), &code("EUR")).await.unwrap();
        clock.advance(DEFAULT_CACHE_TTL - Duration::from_secs(1));
        provider.set_rate(Some(0.95));
        let second = resolver.resolve(&code("USD"), &code("EUR")).await.unwrap();

        assert_eq!(first, 0.92);
        assert_eq!(second, 0.92);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_resolve_after_ttl_refetches() {
        let provider = Arc::new(MockRateProvider::returning(Some(0.92)));
        let (resolver, clock) = resolver_with(provider.clone());

        resolver.resolve(&code("USD"), &code("EUR")).await.unwrap();
        clock.advance(DEFAULT_CACHE_TTL);
        provider.set_rate(Some(0.95));
        let rate = resolver.resolve(&code("USD"), &code("EUR")).await.unwrap();

        assert_eq!(rate, 0.95);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_pairs_are_cached_per_direction() {
        let provider = Arc::new(MockRateProvider::returning(Some(3.65)));
        let (resolver, _clock) = resolver_with(provider.clone());

        resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();
        provider.set_rate(Some(0.274));
        let reverse = resolver.resolve(&code("ILS"), &code("USD")).await.unwrap();

        assert_eq!(reverse, 0.274);
        assert_eq!(provider.calls(), 2);
    }

    // Caching a fallback value would hide the provider's recovery for a full
    // TTL window; every call during an outage must retry the provider.
    #[tokio::test]
    async fn test_fallback_rate_is_not_cached() {
        let provider = Arc::new(MockRateProvider::returning(None));
        let (resolver, _clock) = resolver_with(provider.clone());

        let rate = resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();
        assert_eq!(rate, 3.7);
        assert_eq!(provider.calls(), 1);
        assert!(resolver.cache().is_empty().await);

        let rate = resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();
        assert_eq!(rate, 3.7);
        assert_eq!(provider.calls(), 2);

        // Provider recovers: live rate is returned straight away
        provider.set_rate(Some(3.62));
        let rate = resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();
        assert_eq!(rate, 3.62);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_reverse_fallback_rate() {
        let provider = Arc::new(MockRateProvider::returning(None));
        let (resolver, _clock) = resolver_with(provider.clone());

        let rate = resolver.resolve(&code("ILS"), &code("USD")).await.unwrap();
        assert_eq!(rate, 0.27);
    }

    #[tokio::test]
    async fn test_rate_unavailable_carries_pair() {
        let provider = Arc::new(MockRateProvider::returning(None));
        let (resolver, _clock) = resolver_with(provider.clone());

        let err = resolver
            .resolve(&code("USD"), &code("EUR"))
            .await
            .unwrap_err();

        let pair = err.pair().expect("error should carry the pair");
        assert_eq!(pair, RatePair::new(code("USD"), code("EUR")));
        assert_eq!(
            err.to_string(),
            "Unable to get exchange rate for USD to EUR"
        );
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_a_provider_failure() {
        for bad in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let provider = Arc::new(MockRateProvider::returning(Some(bad)));
            let (resolver, _clock) = resolver_with(provider.clone());

            assert_eq!(
                resolver.resolve(&code("USD"), &code("ILS")).await.unwrap(),
                3.7
            );
            assert!(resolver.resolve(&code("USD"), &code("GBP")).await.is_err());
            assert!(resolver.cache().is_empty().await);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_uses_fallback() {
        let provider = Arc::new(MockRateProvider::slow(3.62, Duration::from_secs(30)));
        let (resolver, _clock) = resolver_with(provider.clone());
        let resolver = resolver.with_timeout(Duration::from_secs(2));

        let rate = resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();
        assert_eq!(rate, 3.7);
        assert_eq!(provider.calls(), 1);
        assert!(resolver.cache().is_empty().await);
    }

    // Concurrent misses each reach the provider; the cache lock is released
    // while the fetch is in flight.
    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_fetch_in_parallel() {
        let provider = Arc::new(MockRateProvider::slow(3.62, Duration::from_secs(1)));
        let (resolver, _clock) = resolver_with(provider.clone());
        let (usd, ils, eur) = (code("USD"), code("ILS"), code("EUR"));

        let started = tokio::time::Instant::now();
        let (a, b) = tokio::join!(resolver.resolve(&usd, &ils), resolver.resolve(&usd, &ils));
        assert_eq!(a.unwrap(), 3.62);
        assert_eq!(b.unwrap(), 3.62);
        assert_eq!(provider.calls(), 2);

        let (c, d) = tokio::join!(resolver.resolve(&usd, &eur), resolver.resolve(&ils, &eur));
        assert_eq!(c.unwrap(), 3.62);
        assert_eq!(d.unwrap(), 3.62);
        assert_eq!(provider.calls(), 4);
        assert!(started.elapsed() < Duration::from_secs(3));

        assert_eq!(resolver.cache().len().await, 3);
        resolver.resolve(&usd, &ils).await.unwrap();
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let provider = Arc::new(MockRateProvider::returning(Some(3.65)));
        let (resolver, _clock) = resolver_with(provider.clone());

        resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();
        resolver.clear_cache().await;
        resolver.resolve(&code("USD"), &code("ILS")).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }
}
