use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single data point for the close / moving-average price chart.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChartPoint {
    pub date: NaiveDate,

    pub close: f64,

    /// Short moving average at this bar, `None` during warm-up
    pub ma_short: Option<f64>,

    /// Long moving average at this bar, `None` during warm-up
    pub ma_long: Option<f64>,
}
