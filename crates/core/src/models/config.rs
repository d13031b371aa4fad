use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

use super::asset::Equity;
use super::indicators::IndicatorWindows;
use super::price::HistoryPeriod;

/// Tolerance when checking that a weight vector sums to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Which scoring rule a run uses. The two are not interchangeable and are
/// never mixed within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Clamped linear normalization of every metric to [0, 1]
    #[default]
    Continuous,
    /// Full weight when a metric crosses its threshold, zero otherwise
    Threshold,
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::Continuous => write!(f, "continuous"),
            ScoringMode::Threshold => write!(f, "threshold"),
        }
    }
}

/// A `[low, high]` range for `normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Normalization ranges for the continuous scoring mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationBounds {
    pub rsi: Bounds,
    pub macd: Bounds,
    pub pe_ratio: Bounds,
    pub debt_to_equity: Bounds,
    pub profit_margin: Bounds,
}

impl Default for NormalizationBounds {
    fn default() -> Self {
        Self {
            rsi: Bounds::new(30.0, 70.0),
            macd: Bounds::new(-5.0, 5.0),
            pe_ratio: Bounds::new(10.0, 40.0),
            debt_to_equity: Bounds::new(0.0, 200.0),
            profit_margin: Bounds::new(0.0, 0.3),
        }
    }
}

/// Substitutes for missing fundamentals and undefined indicators.
///
/// Fundamentals default pessimistically (P/E, D/E) or neutrally (margin);
/// indicators default to the neutral midpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingValueDefaults {
    pub pe_ratio: f64,
    pub debt_to_equity: f64,
    pub profit_margin: f64,
    pub rsi: f64,
    pub macd_histogram: f64,
}

impl Default for MissingValueDefaults {
    fn default() -> Self {
        Self {
            pe_ratio: 50.0,
            debt_to_equity: 100.0,
            profit_margin: 0.1,
            rsi: 50.0,
            macd_histogram: 0.0,
        }
    }
}

/// Cut-offs for the threshold scoring mode. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// P/E must be below this
    pub max_pe_ratio: f64,
    /// D/E must be below this
    pub max_debt_to_equity: f64,
    /// Margin must be above this
    pub min_profit_margin: f64,
    /// RSI must lie strictly inside this band
    pub rsi_band: Bounds,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_pe_ratio: 30.0,
            max_debt_to_equity: 100.0,
            min_profit_margin: 0.1,
            rsi_band: Bounds::new(40.0, 70.0),
        }
    }
}

/// Weights of the continuous mode's five components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousWeights {
    pub rsi: f64,
    pub macd: f64,
    pub pe_ratio: f64,
    pub debt_to_equity: f64,
    pub profit_margin: f64,
}

impl Default for ContinuousWeights {
    fn default() -> Self {
        Self {
            rsi: 0.25,
            macd: 0.20,
            pe_ratio: 0.20,
            debt_to_equity: 0.15,
            profit_margin: 0.20,
        }
    }
}

impl ContinuousWeights {
    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("pe_ratio", self.pe_ratio),
            ("debt_to_equity", self.debt_to_equity),
            ("profit_margin", self.profit_margin),
        ]
    }
}

/// Weights of the threshold mode's five components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdWeights {
    pub pe_ratio: f64,
    pub debt_to_equity: f64,
    pub profit_margin: f64,
    pub golden_cross: f64,
    pub rsi: f64,
}

impl Default for ThresholdWeights {
    fn default() -> Self {
        Self {
            pe_ratio: 0.25,
            debt_to_equity: 0.20,
            profit_margin: 0.25,
            golden_cross: 0.15,
            rsi: 0.15,
        }
    }
}

impl ThresholdWeights {
    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("pe_ratio", self.pe_ratio),
            ("debt_to_equity", self.debt_to_equity),
            ("profit_margin", self.profit_margin),
            ("golden_cross", self.golden_cross),
            ("rsi", self.rsi),
        ]
    }
}

/// Everything the scoring engine needs, passed in at construction.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Tickers scored in every run, in display order
    pub equities: Vec<Equity>,

    /// Trailing window of price history to fetch
    pub history_period: HistoryPeriod,

    /// Percentage of the portfolio split among the equities
    pub stock_budget: f64,

    pub mode: ScoringMode,
    pub windows: IndicatorWindows,
    pub bounds: NormalizationBounds,
    pub defaults: MissingValueDefaults,
    pub thresholds: Thresholds,
    pub continuous_weights: ContinuousWeights,
    pub threshold_weights: ThresholdWeights,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "alphavantage"). Values: the key.
    pub api_keys: HashMap<String, String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            equities: vec![
                Equity::new("TSLA", "Tesla"),
                Equity::new("NVDA", "Nvidia"),
                Equity::new("ONT.L", "Oxford Nanopore"),
            ],
            history_period: HistoryPeriod::default(),
            stock_budget: 60.0,
            mode: ScoringMode::default(),
            windows: IndicatorWindows::default(),
            bounds: NormalizationBounds::default(),
            defaults: MissingValueDefaults::default(),
            thresholds: Thresholds::default(),
            continuous_weights: ContinuousWeights::default(),
            threshold_weights: ThresholdWeights::default(),
            api_keys: HashMap::new(),
        }
    }
}

impl ScoringConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let mut config: ScoringConfig = serde_json::from_str(json)?;
        config.equities = config
            .equities
            .into_iter()
            .map(|e| Equity::new(e.symbol, e.name))
            .collect();
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize config: {e}")))
    }

    /// Check the preconditions the scoring engine relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.equities.is_empty() {
            return Err(CoreError::InvalidConfig(
                "At least one equity must be configured".into(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for equity in &self.equities {
            if equity.symbol.is_empty() {
                return Err(CoreError::InvalidConfig(format!(
                    "Equity '{}' has an empty symbol",
                    equity.name
                )));
            }
            if !seen.insert(equity.symbol.as_str()) {
                return Err(CoreError::InvalidConfig(format!(
                    "Duplicate equity symbol '{}'",
                    equity.symbol
                )));
            }
        }

        validate_budget(self.stock_budget)?;

        let w = &self.windows;
        for (name, len) in [
            ("ma_short", w.ma_short),
            ("ma_long", w.ma_long),
            ("rsi", w.rsi),
            ("macd_fast", w.macd_fast),
            ("macd_slow", w.macd_slow),
            ("macd_signal", w.macd_signal),
        ] {
            if len == 0 {
                return Err(CoreError::InvalidConfig(format!(
                    "Indicator window '{name}' must be at least 1"
                )));
            }
        }

        let b = &self.bounds;
        for (name, bounds) in [
            ("rsi", b.rsi),
            ("macd", b.macd),
            ("pe_ratio", b.pe_ratio),
            ("debt_to_equity", b.debt_to_equity),
            ("profit_margin", b.profit_margin),
            ("thresholds.rsi_band", self.thresholds.rsi_band),
        ] {
            if !bounds.low.is_finite() || !bounds.high.is_finite() || bounds.low >= bounds.high {
                return Err(CoreError::InvalidConfig(format!(
                    "Bounds '{name}' must be finite with low < high (got {} .. {})",
                    bounds.low, bounds.high
                )));
            }
        }

        validate_weights("continuous_weights", &self.continuous_weights.values())?;
        validate_weights("threshold_weights", &self.threshold_weights.values())?;

        Ok(())
    }
}

/// A stock budget is a percentage of the whole portfolio.
pub(crate) fn validate_budget(budget: f64) -> Result<(), CoreError> {
    if !budget.is_finite() || !(0.0..=100.0).contains(&budget) {
        return Err(CoreError::InvalidConfig(format!(
            "Stock budget must be between 0 and 100 percent (got {budget})"
        )));
    }
    Ok(())
}

fn validate_weights(group: &str, weights: &[(&'static str, f64)]) -> Result<(), CoreError> {
    for (name, weight) in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "Weight {group}.{name} must be finite and non-negative (got {weight})"
            )));
        }
    }
    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(CoreError::InvalidConfig(format!(
            "Weights in {group} must sum to 1.0 (got {sum})"
        )));
    }
    Ok(())
}
