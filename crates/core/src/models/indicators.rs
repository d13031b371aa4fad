use serde::{Deserialize, Serialize};

/// Technical indicators derived from one price series, as of its last bar.
///
/// `None` means the series was too short for that indicator. It is never
/// folded into 0, since 0 is a meaningful MACD value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// RSI in [0, 100]
    pub rsi: Option<f64>,

    /// MACD line minus signal line
    pub macd_histogram: Option<f64>,

    /// Short simple moving average (50 bars by default)
    pub ma_short: Option<f64>,

    /// Long simple moving average (200 bars by default)
    pub ma_long: Option<f64>,

    /// `ma_short > ma_long`; false when either is undefined
    pub golden_cross: bool,
}

/// Window lengths used by the indicator calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWindows {
    pub ma_short: usize,
    pub ma_long: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            ma_short: 50,
            ma_long: 200,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}
