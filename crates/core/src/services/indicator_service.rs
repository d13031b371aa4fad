use tracing::debug;

use crate::models::indicators::{IndicatorSet, IndicatorWindows};
use crate::models::price::PriceSeries;

/// Derives technical indicators from a price series.
///
/// Pure computation, no I/O. Every indicator that needs more history than
/// the series holds comes back as `None`.
pub struct IndicatorService {
    windows: IndicatorWindows,
}

impl IndicatorService {
    pub fn new(windows: IndicatorWindows) -> Self {
        Self { windows }
    }

    /// Compute RSI, MACD histogram, both moving averages and the golden
    /// cross flag as of the last bar.
    pub fn compute_indicators(&self, series: &PriceSeries) -> IndicatorSet {
        let closes = series.closes();
        let w = &self.windows;

        let ma_short = simple_moving_average(&closes, w.ma_short);
        let ma_long = simple_moving_average(&closes, w.ma_long);
        let golden_cross = matches!((ma_short, ma_long), (Some(s), Some(l)) if s > l);

        let indicators = IndicatorSet {
            rsi: relative_strength_index(&closes, w.rsi),
            macd_histogram: macd_histogram(&closes, w.macd_fast, w.macd_slow, w.macd_signal),
            ma_short,
            ma_long,
            golden_cross,
        };

        debug!(
            symbol = %series.symbol,
            bars = closes.len(),
            rsi = ?indicators.rsi,
            macd_histogram = ?indicators.macd_histogram,
            golden_cross,
            "computed indicators"
        );

        indicators
    }
}

impl Default for IndicatorService {
    fn default() -> Self {
        Self::new(IndicatorWindows::default())
    }
}

/// Mean of the last `window` values, `None` when there are fewer.
pub fn simple_moving_average(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Trailing mean at every position; `None` until `window` values are seen.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| simple_moving_average(&values[..=i], window))
        .collect()
}

/// Exponential moving average with α = 2/(span+1), seeded with the first
/// value: `ema[0] = x[0]`, `ema[i] = α·x[i] + (1-α)·ema[i-1]`.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return out;
    };
    let mut ema = first;
    out.push(ema);
    for &value in iter {
        ema = alpha * value + (1.0 - alpha) * ema;
        out.push(ema);
    }
    out
}

/// RSI over the last `period` close-to-close changes, using simple means of
/// gains and losses. Needs `period + 1` closes.
///
/// No losses in the window means RSI = 100.
pub fn relative_strength_index(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let window = &closes[closes.len() - (period + 1)..];
    let (gain_sum, loss_sum) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gains, losses), delta| {
            (gains + delta.max(0.0), losses + (-delta).max(0.0))
        });

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// MACD histogram at the last bar: (EMA(fast) - EMA(slow)) minus its own
/// EMA(signal).
pub fn macd_histogram(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<f64> {
    if closes.is_empty() {
        return None;
    }

    let ema_fast = ema_series(closes, fast);
    let ema_slow = ema_series(closes, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&macd_line, signal);

    Some(macd_line.last()? - signal_line.last()?)
}
