use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::fundamentals::FundamentalsSnapshot;
use crate::models::price::{HistoryPeriod, PriceBar, PriceSeries};
use super::traits::MarketDataProvider;

const PROVIDER: &str = "Alpha Vantage";
const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage API provider, used as a fallback behind Yahoo Finance.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (set in the config as "alphavantage").
/// - **History**: compact daily series (last 100 trading days), so the
///   long moving average is usually undefined when this provider answers.
/// - **Fundamentals**: `OVERVIEW` reports P/E and profit margin but not
///   debt to equity, which is always `None` here.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    /// Alpha Vantage encodes numbers as strings and missing ones as
    /// "None" or "-".
    fn parse_number(value: Option<&str>) -> Option<f64> {
        value
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    fn parse_bar(date_str: &str, data: &DailyData) -> Option<PriceBar> {
        Some(PriceBar {
            date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?,
            open: data.open.parse().ok()?,
            high: data.high.parse().ok()?,
            low: data.low.parse().ok()?,
            close: data.close.parse().ok()?,
            volume: data.volume.parse().unwrap_or(0),
        })
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

#[derive(Deserialize)]
struct OverviewResponse {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "ProfitMargin")]
    profit_margin: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, CoreError> {
        let resp: TimeSeriesResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", &symbol.to_uppercase()),
                ("outputsize", "compact"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse time series for {symbol}: {e}"),
            })?;

        let time_series = resp.time_series.ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: resp
                .note
                .or(resp.information)
                .unwrap_or_else(|| format!("No time series data for {symbol}")),
        })?;

        let from = period.start_date(chrono::Utc::now().date_naive());
        let bars: Vec<PriceBar> = time_series
            .iter()
            .filter_map(|(date_str, data)| Self::parse_bar(date_str, data))
            .filter(|bar| bar.date >= from)
            .collect();

        Ok(PriceSeries::new(symbol, bars))
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, CoreError> {
        let resp: OverviewResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse overview for {symbol}: {e}"),
            })?;

        // Unknown symbols and rate limits both come back without "Symbol".
        if resp.symbol.is_none() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: resp
                    .note
                    .or(resp.information)
                    .unwrap_or_else(|| format!("No overview data for {symbol}")),
            });
        }

        Ok(FundamentalsSnapshot::new(
            Self::parse_number(resp.pe_ratio.as_deref()),
            None,
            Self::parse_number(resp.profit_margin.as_deref()),
        ))
    }
}
