use serde::{Deserialize, Serialize};

use super::asset::Equity;
use super::chart::PriceChartPoint;
use super::config::ScoringMode;
use super::fundamentals::FundamentalsSnapshot;
use super::indicators::IndicatorSet;

/// Weighted component scores behind one ticker's total.
///
/// Every component is already multiplied by its weight, so the total is
/// their sum. Golden cross only contributes in threshold mode and MACD only
/// in continuous mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mode: ScoringMode,
    pub rsi: f64,
    pub macd: f64,
    pub pe_ratio: f64,
    pub debt_to_equity: f64,
    pub profit_margin: f64,
    pub golden_cross: f64,
    pub total: f64,
}

/// Everything computed for a ticker whose market data was retrieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerAnalysis {
    pub equity: Equity,
    pub fundamentals: FundamentalsSnapshot,
    pub indicators: IndicatorSet,
    pub breakdown: ScoreBreakdown,
    pub chart: Vec<PriceChartPoint>,
}

/// Per-ticker result of a scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TickerOutcome {
    Scored(TickerAnalysis),
    /// Data retrieval failed; the ticker scores 0.
    Failed { equity: Equity, reason: String },
}

impl TickerOutcome {
    pub fn equity(&self) -> &Equity {
        match self {
            TickerOutcome::Scored(analysis) => &analysis.equity,
            TickerOutcome::Failed { equity, .. } => equity,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            TickerOutcome::Scored(analysis) => analysis.breakdown.total,
            TickerOutcome::Failed { .. } => 0.0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TickerOutcome::Failed { .. })
    }
}

/// One ticker's share of the stock budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub equity: Equity,
    pub score: f64,

    /// Percentage of the whole portfolio (not of the stock portion)
    pub percentage: f64,
}

/// Suggested split of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Percentage reserved for the scored equities
    pub stock_budget: f64,

    /// Remainder, held in the index fund (100 - stock_budget)
    pub index_fund_percentage: f64,

    /// In input order
    pub allocations: Vec<Allocation>,

    /// True when every score was zero and the budget was split equally
    pub equal_split: bool,
}

impl AllocationResult {
    pub fn percentage_for(&self, symbol: &str) -> Option<f64> {
        let upper = symbol.to_uppercase();
        self.allocations
            .iter()
            .find(|a| a.equity.symbol == upper)
            .map(|a| a.percentage)
    }

    pub fn total_percentage(&self) -> f64 {
        self.allocations.iter().map(|a| a.percentage).sum()
    }
}

/// Result of one full equity scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityReport {
    pub outcomes: Vec<TickerOutcome>,
    pub allocation: AllocationResult,
}

impl EquityReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}
