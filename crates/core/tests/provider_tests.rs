// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry, Yahoo Finance, Alpha Vantage, trait objects
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use investor_dashboard_core::errors::CoreError;
use investor_dashboard_core::models::fundamentals::FundamentalsSnapshot;
use investor_dashboard_core::models::price::{HistoryPeriod, PriceBar, PriceSeries};
use investor_dashboard_core::providers::alphavantage::AlphaVantageProvider;
use investor_dashboard_core::providers::registry::MarketDataRegistry;
use investor_dashboard_core::providers::traits::MarketDataProvider;
use investor_dashboard_core::providers::yahoo_finance::YahooFinanceProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// A mock provider returning one flat bar per call.
struct MockProvider {
    name: String,
}

impl MockProvider {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        _period: HistoryPeriod,
    ) -> Result<PriceSeries, CoreError> {
        let bar = PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            volume: 0,
        };
        Ok(PriceSeries::new(symbol, vec![bar]))
    }

    async fn fetch_fundamentals(&self, _symbol: &str) -> Result<FundamentalsSnapshot, CoreError> {
        Ok(FundamentalsSnapshot::default())
    }
}

fn names(registry: &MarketDataRegistry) -> Vec<String> {
    registry.names()
}

// ═══════════════════════════════════════════════════════════════════
// MarketDataRegistry — construction and ordering
// ═══════════════════════════════════════════════════════════════════

mod registry_construction {
    use super::*;

    #[test]
    fn new_creates_empty_registry() {
        let registry = MarketDataRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.providers().is_empty());
    }

    #[test]
    fn default_creates_empty_registry() {
        assert!(MarketDataRegistry::default().is_empty());
    }

    #[test]
    fn register_single_provider() {
        let mut registry = MarketDataRegistry::new();
        registry.register(Box::new(MockProvider::new("Only")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.providers()[0].name(), "Only");
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = MarketDataRegistry::new();
        registry.register(Box::new(MockProvider::new("First")));
        registry.register(Box::new(MockProvider::new("Second")));
        registry.register(Box::new(MockProvider::new("Third")));
        assert_eq!(names(&registry), vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn registered_providers_are_callable() {
        let mut registry = MarketDataRegistry::new();
        registry.register(Box::new(MockProvider::new("Mock")));
        let provider = registry.providers()[0];
        let series = provider
            .fetch_price_history("tsla", HistoryPeriod::OneYear)
            .await
            .unwrap();
        assert_eq!(series.last_close(), Some(100.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// MarketDataRegistry — defaults
// ═══════════════════════════════════════════════════════════════════

mod registry_defaults {
    use super::*;

    #[test]
    fn without_api_keys_only_yahoo() {
        let registry = MarketDataRegistry::new_with_defaults(&HashMap::new());
        assert_eq!(names(&registry), vec!["Yahoo Finance"]);
    }

    #[test]
    fn with_alphavantage_key_has_fallback() {
        let mut keys = HashMap::new();
        keys.insert("alphavantage".to_string(), "av-key".to_string());
        let registry = MarketDataRegistry::new_with_defaults(&keys);
        // Yahoo Finance is primary, Alpha Vantage second
        assert_eq!(names(&registry), vec!["Yahoo Finance", "Alpha Vantage"]);
    }

    #[test]
    fn irrelevant_keys_ignored() {
        let mut keys = HashMap::new();
        keys.insert("unknown_provider".to_string(), "whatever".to_string());
        let registry = MarketDataRegistry::new_with_defaults(&keys);
        assert_eq!(registry.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Concrete providers
// ═══════════════════════════════════════════════════════════════════

mod yahoo_finance {
    use super::*;

    #[test]
    fn name() {
        let provider = YahooFinanceProvider::new().unwrap();
        assert_eq!(provider.name(), "Yahoo Finance");
    }
}

mod alphavantage {
    use super::*;

    #[test]
    fn name() {
        let provider = AlphaVantageProvider::new("k".into());
        assert_eq!(provider.name(), "Alpha Vantage");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trait compliance
// ═══════════════════════════════════════════════════════════════════

mod trait_compliance {
    use super::*;

    /// Providers are shared across awaits, so they must be Send + Sync.
    #[test]
    fn providers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<YahooFinanceProvider>();
        assert_send_sync::<AlphaVantageProvider>();
        assert_send_sync::<MarketDataRegistry>();
    }

    #[test]
    fn providers_as_trait_objects() {
        let mut registry = MarketDataRegistry::new();
        registry.register(Box::new(YahooFinanceProvider::new().unwrap()));
        registry.register(Box::new(AlphaVantageProvider::new("k".into())));
        registry.register(Box::new(MockProvider::new("Mock")));
        assert_eq!(
            names(&registry),
            vec!["Yahoo Finance", "Alpha Vantage", "Mock"]
        );
    }
}
