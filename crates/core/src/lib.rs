pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    analysis::{AllocationResult, EquityReport, TickerAnalysis, TickerOutcome},
    asset::Equity,
    config::ScoringConfig,
    holding::{ManualHoldings, NetWorthSummary},
};
use providers::registry::MarketDataRegistry;
use services::{
    allocation_service::AllocationService, chart_service::ChartService,
    indicator_service::IndicatorService, market_data_service::MarketDataService,
    portfolio_service::PortfolioService, scoring_service::ScoringService,
};
use tracing::{info, warn};

use errors::CoreError;

/// Main entry point for the investor dashboard core library.
///
/// Holds the scoring configuration and all services needed to turn market
/// data into an allocation. Each run is computed fresh; nothing is cached
/// between calls.
#[must_use]
pub struct InvestorDashboard {
    config: ScoringConfig,
    portfolio_service: PortfolioService,
    market_data_service: MarketDataService,
    indicator_service: IndicatorService,
    chart_service: ChartService,
    scoring_service: ScoringService,
    allocation_service: AllocationService,
}

impl std::fmt::Debug for InvestorDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestorDashboard")
            .field("equities", &self.config.equities.len())
            .field("mode", &self.config.mode)
            .field("stock_budget", &self.config.stock_budget)
            .field("providers", &self.market_data_service.get_provider_names())
            .finish()
    }
}

impl InvestorDashboard {
    /// Validate `config` and wire up the default providers
    /// (Yahoo Finance, plus Alpha Vantage when its key is configured).
    pub fn new(config: ScoringConfig) -> Result<Self, CoreError> {
        let registry = MarketDataRegistry::new_with_defaults(&config.api_keys);
        Self::with_registry(config, registry)
    }

    /// Same as `new`, with an explicit provider registry.
    pub fn with_registry(
        config: ScoringConfig,
        registry: MarketDataRegistry,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            portfolio_service: PortfolioService::new(),
            market_data_service: MarketDataService::new(registry),
            indicator_service: IndicatorService::new(config.windows.clone()),
            chart_service: ChartService::new(&config.windows),
            scoring_service: ScoringService::new(config.clone()),
            allocation_service: AllocationService::new(),
            config,
        })
    }

    // ── Manual Portfolio ────────────────────────────────────────────

    /// Signed line items and net worth of the manual holdings.
    #[must_use]
    pub fn compute_net_worth(&self, holdings: &ManualHoldings) -> NetWorthSummary {
        self.portfolio_service.compute_net_worth(holdings)
    }

    // ── Equity Scoring ──────────────────────────────────────────────

    /// Fetch, compute and score a single equity.
    ///
    /// Never fails: a provider error becomes `TickerOutcome::Failed`.
    pub async fn analyze_ticker(&self, equity: &Equity) -> TickerOutcome {
        match self.try_analyze(equity).await {
            Ok(analysis) => TickerOutcome::Scored(analysis),
            Err(e) => {
                warn!(symbol = %equity.symbol, "scoring {} as 0: {e}", equity.name);
                TickerOutcome::Failed {
                    equity: equity.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Score every configured equity in order, then allocate the stock
    /// budget across them. Failed tickers take part with score 0.
    pub async fn analyze_equities(&self) -> Result<EquityReport, CoreError> {
        let mut outcomes = Vec::with_capacity(self.config.equities.len());
        for equity in &self.config.equities {
            outcomes.push(self.analyze_ticker(equity).await);
        }

        let allocation = self.allocate_outcomes(&outcomes)?;
        let report = EquityReport {
            outcomes,
            allocation,
        };

        info!(
            tickers = report.outcomes.len(),
            failed = report.failed_count(),
            mode = %self.config.mode,
            "equity scoring run complete"
        );

        Ok(report)
    }

    /// Allocate the configured stock budget across a set of outcomes.
    pub fn allocate_outcomes(
        &self,
        outcomes: &[TickerOutcome],
    ) -> Result<AllocationResult, CoreError> {
        let scores: Vec<(Equity, f64)> = outcomes
            .iter()
            .map(|o| (o.equity().clone(), o.score()))
            .collect();
        self.allocation_service
            .allocate(&scores, self.config.stock_budget)
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Names of the registered market data providers, in priority order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.market_data_service.get_provider_names()
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn try_analyze(&self, equity: &Equity) -> Result<TickerAnalysis, CoreError> {
        let series = self
            .market_data_service
            .fetch_price_history(&equity.symbol, self.config.history_period)
            .await
            .map_err(|e| CoreError::DataUnavailable {
                symbol: equity.symbol.clone(),
                reason: e.to_string(),
            })?;
        let fundamentals = self
            .market_data_service
            .fetch_fundamentals(&equity.symbol)
            .await
            .map_err(|e| CoreError::DataUnavailable {
                symbol: equity.symbol.clone(),
                reason: e.to_string(),
            })?;

        let indicators = self.indicator_service.compute_indicators(&series);
        let breakdown = self.scoring_service.breakdown(&fundamentals, &indicators);
        let chart = self.chart_service.generate_price_chart(&series);

        Ok(TickerAnalysis {
            equity: equity.clone(),
            fundamentals,
            indicators,
            breakdown,
            chart,
        })
    }
}
