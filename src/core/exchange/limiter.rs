use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::traits::{AdapterFail, AdapterOutcome, ExchangeAdapter, RawOrderBook, Ticker};
use crate::core::domain::{MarketMeta, Symbol};
use std::collections::BTreeMap;

const RATE_LIMIT_BACKOFF: Duration = Duration::from_millis(1000);

/// Wraps any `ExchangeAdapter` with the timeout/retry policy of spec.md
/// §4.1: every call is bounded by `timeout`, and a `RateLimited` outcome is
/// retried exactly once after a 1000ms wait; any other failure (including a
/// second rate-limit) resolves to the failure outcome and is logged. This is
/// itself an `ExchangeAdapter`, so the scheduler and Pair Fetcher never know
/// whether they're talking to a decorated or bare adapter.
pub struct RateLimited<A> {
    inner: A,
    venue: &'static str,
    timeout: Duration,
}

impl<A> RateLimited<A> {
    pub fn new(inner: A, venue: &'static str, timeout: Duration) -> Self {
        Self { inner, venue, timeout }
    }
}

async fn with_retry<T, F, Fut>(venue: &str, timeout: Duration, call: F) -> AdapterOutcome<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = AdapterOutcome<T>>,
{
    let first = match tokio::time::timeout(timeout, call()).await {
        Ok(result) => result,
        Err(_) => Err(AdapterFail::Timeout),
    };

    match first {
        Err(AdapterFail::RateLimited) => {
            tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
            match tokio::time::timeout(timeout, call()).await {
                Ok(result) => {
                    if result.is_err() {
                        warn!(venue, "adapter call failed again after rate-limit retry");
                    }
                    result
                }
                Err(_) => {
                    warn!(venue, "adapter call timed out on rate-limit retry");
                    Err(AdapterFail::Timeout)
                }
            }
        }
        Err(ref fail) => {
            warn!(venue, reason = %fail, "adapter call failed");
            first
        }
        Ok(_) => first,
    }
}

#[async_trait]
impl<A: ExchangeAdapter> ExchangeAdapter for RateLimited<A> {
    async fn load_markets(&self) -> AdapterOutcome<BTreeMap<Symbol, MarketMeta>> {
        with_retry(self.venue, self.timeout, || self.inner.load_markets()).await
    }

    async fn fetch_ticker(&self, symbol: &Symbol) -> AdapterOutcome<Ticker> {
        with_retry(self.venue, self.timeout, || self.inner.fetch_ticker(symbol)).await
    }

    async fn fetch_order_book(&self, symbol: &Symbol, depth: usize) -> AdapterOutcome<RawOrderBook> {
        with_retry(self.venue, self.timeout, || self.inner.fetch_order_book(symbol, depth)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exchange::simulated::SimulatedAdapter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FlakyOnce {
        inner: SimulatedAdapter,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ExchangeAdapter for FlakyOnce {
        async fn load_markets(&self) -> AdapterOutcome<BTreeMap<Symbol, MarketMeta>> {
            self.inner.load_markets().await
        }
        async fn fetch_ticker(&self, symbol: &Symbol) -> AdapterOutcome<Ticker> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(AdapterFail::RateLimited);
            }
            self.inner.fetch_ticker(symbol).await
        }
        async fn fetch_order_book(&self, symbol: &Symbol, depth: usize) -> AdapterOutcome<RawOrderBook> {
            self.inner.fetch_order_book(symbol, depth).await
        }
    }

    #[tokio::test]
    async fn retries_once_after_rate_limit_then_succeeds() {
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let mut sim = SimulatedAdapter::new();
        sim.set_ticker(symbol.clone(), Ticker {
            last: Default::default(),
            bid: Default::default(),
            ask: Default::default(),
            base_volume: Default::default(),
            percentage: Default::default(),
        });
        let flaky = FlakyOnce { inner: sim, calls: Arc::new(AtomicUsize::new(0)) };
        let wrapped = RateLimited::new(flaky, "test", Duration::from_secs(1));

        let result = wrapped.fetch_ticker(&symbol).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn gives_up_after_second_rate_limit() {
        struct AlwaysRateLimited;
        #[async_trait]
        impl ExchangeAdapter for AlwaysRateLimited {
            async fn load_markets(&self) -> AdapterOutcome<BTreeMap<Symbol, MarketMeta>> {
                Err(AdapterFail::RateLimited)
            }
            async fn fetch_ticker(&self, _symbol: &Symbol) -> AdapterOutcome<Ticker> {
                Err(AdapterFail::RateLimited)
            }
            async fn fetch_order_book(&self, _symbol: &Symbol, _depth: usize) -> AdapterOutcome<RawOrderBook> {
                Err(AdapterFail::RateLimited)
            }
        }

        let wrapped = RateLimited::new(AlwaysRateLimited, "test", Duration::from_millis(50));
        let symbol = Symbol::new("BTC/USDT").unwrap();
        let result = wrapped.fetch_ticker(&symbol).await;
        assert_eq!(result, Err(AdapterFail::RateLimited));
    }
}
