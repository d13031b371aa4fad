use tracing::debug;

use crate::models::analysis::ScoreBreakdown;
use crate::models::config::{Bounds, ScoringConfig, ScoringMode};
use crate::models::fundamentals::FundamentalsSnapshot;
use crate::models::indicators::IndicatorSet;

/// Linear clamped normalization: `clamp((v - low) / (high - low), 0, 1)`.
///
/// Assumes `low < high` (enforced by `ScoringConfig::validate`).
pub fn normalize(value: f64, low: f64, high: f64) -> f64 {
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}

fn normalize_in(value: f64, bounds: Bounds) -> f64 {
    normalize(value, bounds.low, bounds.high)
}

/// Turns fundamentals and indicators into one weighted score per ticker.
///
/// The mode is fixed by the config at construction, so every ticker of a
/// run is scored by the same rule.
pub struct ScoringService {
    config: ScoringConfig,
}

/// Raw inputs after substituting defaults for anything missing.
struct ResolvedInputs {
    rsi: Option<f64>,
    macd_histogram: f64,
    pe_ratio: f64,
    debt_to_equity: f64,
    profit_margin: f64,
    golden_cross: bool,
}

impl ScoringService {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Combined score of one ticker, in [0, 1].
    pub fn score_ticker(
        &self,
        fundamentals: &FundamentalsSnapshot,
        indicators: &IndicatorSet,
    ) -> f64 {
        self.breakdown(fundamentals, indicators).total
    }

    /// Weighted component scores and their total.
    pub fn breakdown(
        &self,
        fundamentals: &FundamentalsSnapshot,
        indicators: &IndicatorSet,
    ) -> ScoreBreakdown {
        let inputs = self.resolve(fundamentals, indicators);
        let breakdown = match self.config.mode {
            ScoringMode::Continuous => self.continuous(&inputs),
            ScoringMode::Threshold => self.threshold(&inputs),
        };
        debug!(mode = %breakdown.mode, total = breakdown.total, "scored ticker");
        breakdown
    }

    fn resolve(&self, f: &FundamentalsSnapshot, i: &IndicatorSet) -> ResolvedInputs {
        let d = &self.config.defaults;
        ResolvedInputs {
            rsi: i.rsi.filter(|v| v.is_finite()),
            macd_histogram: i
                .macd_histogram
                .filter(|v| v.is_finite())
                .unwrap_or(d.macd_histogram),
            pe_ratio: f.trailing_pe.unwrap_or(d.pe_ratio),
            debt_to_equity: f.debt_to_equity.unwrap_or(d.debt_to_equity),
            profit_margin: f.profit_margin.unwrap_or(d.profit_margin),
            golden_cross: i.golden_cross,
        }
    }

    fn continuous(&self, inputs: &ResolvedInputs) -> ScoreBreakdown {
        let b = &self.config.bounds;
        let w = &self.config.continuous_weights;
        let rsi = inputs.rsi.unwrap_or(self.config.defaults.rsi);

        let rsi = w.rsi * (1.0 - normalize_in(rsi, b.rsi));
        let macd = w.macd * normalize_in(inputs.macd_histogram, b.macd);
        let pe_ratio = w.pe_ratio * (1.0 - normalize_in(inputs.pe_ratio, b.pe_ratio));
        let debt_to_equity =
            w.debt_to_equity * (1.0 - normalize_in(inputs.debt_to_equity, b.debt_to_equity));
        let profit_margin = w.profit_margin * normalize_in(inputs.profit_margin, b.profit_margin);

        ScoreBreakdown {
            mode: ScoringMode::Continuous,
            rsi,
            macd,
            pe_ratio,
            debt_to_equity,
            profit_margin,
            golden_cross: 0.0,
            total: rsi + macd + pe_ratio + debt_to_equity + profit_margin,
        }
    }

    fn threshold(&self, inputs: &ResolvedInputs) -> ScoreBreakdown {
        let t = &self.config.thresholds;
        let w = &self.config.threshold_weights;
        let award = |hit: bool, weight: f64| if hit { weight } else { 0.0 };

        // An undefined RSI is outside every band.
        let rsi_healthy = inputs
            .rsi
            .is_some_and(|v| v > t.rsi_band.low && v < t.rsi_band.high);

        let pe_ratio = award(inputs.pe_ratio < t.max_pe_ratio, w.pe_ratio);
        let debt_to_equity = award(
            inputs.debt_to_equity < t.max_debt_to_equity,
            w.debt_to_equity,
        );
        let profit_margin = award(inputs.profit_margin > t.min_profit_margin, w.profit_margin);
        let golden_cross = award(inputs.golden_cross, w.golden_cross);
        let rsi = award(rsi_healthy, w.rsi);

        ScoreBreakdown {
            mode: ScoringMode::Threshold,
            rsi,
            macd: 0.0,
            pe_ratio,
            debt_to_equity,
            profit_margin,
            golden_cross,
            total: pe_ratio + debt_to_equity + profit_margin + golden_cross + rsi,
        }
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
