use crate::models::chart::PriceChartPoint;
use crate::models::indicators::IndicatorWindows;
use crate::models::price::PriceSeries;
use crate::services::indicator_service::rolling_mean;

/// Generates chart-ready data sets from price history.
///
/// The core computes all the numbers; the frontend only renders the close
/// line and the two moving averages.
pub struct ChartService {
    ma_short: usize,
    ma_long: usize,
}

impl ChartService {
    pub fn new(windows: &IndicatorWindows) -> Self {
        Self {
            ma_short: windows.ma_short,
            ma_long: windows.ma_long,
        }
    }

    /// One point per bar, with the moving averages as they stood on that
    /// bar (`None` until enough history has accumulated).
    pub fn generate_price_chart(&self, series: &PriceSeries) -> Vec<PriceChartPoint> {
        let closes = series.closes();
        let short = rolling_mean(&closes, self.ma_short);
        let long = rolling_mean(&closes, self.ma_long);

        series
            .bars
            .iter()
            .zip(short.into_iter().zip(long))
            .map(|(bar, (ma_short, ma_long))| PriceChartPoint {
                date: bar.date,
                close: bar.close,
                ma_short,
                ma_long,
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(&IndicatorWindows::default())
    }
}
