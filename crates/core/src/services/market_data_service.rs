use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::fundamentals::FundamentalsSnapshot;
use crate::models::price::{HistoryPeriod, PriceSeries};
use crate::providers::registry::MarketDataRegistry;

/// Fetches price history and fundamentals with ordered provider fallback.
///
/// Tries providers in registration order. If the primary fails (API down,
/// rate limited, unknown symbol), the next provider is asked. The last
/// provider's error is returned when all of them fail.
pub struct MarketDataService {
    registry: MarketDataRegistry,
}

impl MarketDataService {
    pub fn new(registry: MarketDataRegistry) -> Self {
        Self { registry }
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Get the names of all registered providers, in priority order.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Daily history for `symbol` over `period`.
    ///
    /// A series is rejected (and the next provider tried) when it is empty
    /// or holds a non-finite or non-positive close.
    pub async fn fetch_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(format!("price history for {symbol}")));
        }

        let mut last_error = None;
        for provider in &providers {
            debug!(provider = provider.name(), symbol, %period, "fetching price history");
            match provider.fetch_price_history(symbol, period).await {
                Ok(series) => match Self::validate_series(provider.name(), &series) {
                    Ok(()) => return Ok(series),
                    Err(e) => {
                        warn!(provider = provider.name(), symbol, "rejected price history: {e}");
                        last_error = Some(e);
                    }
                },
                Err(e) => {
                    warn!(provider = provider.name(), symbol, "price history failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| CoreError::NoProvider(format!("price history for {symbol}"))))
    }

    /// Latest fundamentals for `symbol`.
    pub async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(format!("fundamentals for {symbol}")));
        }

        let mut last_error = None;
        for provider in &providers {
            debug!(provider = provider.name(), symbol, "fetching fundamentals");
            match provider.fetch_fundamentals(symbol).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) => {
                    warn!(provider = provider.name(), symbol, "fundamentals failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| CoreError::NoProvider(format!("fundamentals for {symbol}"))))
    }

    fn validate_series(provider: &str, series: &PriceSeries) -> Result<(), CoreError> {
        if series.is_empty() {
            return Err(CoreError::Api {
                provider: provider.to_string(),
                message: format!("Empty price history for {}", series.symbol),
            });
        }
        if let Some(bar) = series
            .bars
            .iter()
            .find(|b| !b.close.is_finite() || b.close <= 0.0)
        {
            return Err(CoreError::Api {
                provider: provider.to_string(),
                message: format!(
                    "Invalid close for {} on {}: {} (must be finite and positive)",
                    series.symbol, bar.date, bar.close
                ),
            });
        }
        Ok(())
    }
}
