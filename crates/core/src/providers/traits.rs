use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::fundamentals::FundamentalsSnapshot;
use crate::models::price::{HistoryPeriod, PriceSeries};

/// Trait abstraction for all market data providers.
///
/// Each upstream API (Yahoo Finance, Alpha Vantage) implements this trait.
/// The scoring engine only sees this interface, so tests substitute mocks
/// and a broken upstream is replaced in one place.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily OHLCV history covering the trailing `period`, oldest first.
    async fn fetch_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, CoreError>;

    /// Latest fundamentals snapshot. Fields the provider does not report
    /// are `None`, not an error.
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, CoreError>;
}
