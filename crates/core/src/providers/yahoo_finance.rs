use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::fundamentals::FundamentalsSnapshot;
use crate::models::price::{HistoryPeriod, PriceBar, PriceSeries};
use super::traits::MarketDataProvider;

const PROVIDER: &str = "Yahoo Finance";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance provider for price history and fundamentals.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **History**: daily bars through the `yahoo_finance_api` connector.
/// - **Fundamentals**: the `quoteSummary` endpoint, which needs a session
///   cookie and a matching crumb. The crumb is fetched once and reused.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio connectors).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
    client: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            connector,
            client,
            crumb: Mutex::new(None),
        })
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    fn cached_crumb(&self) -> Option<String> {
        self.crumb.lock().ok().and_then(|guard| guard.clone())
    }

    fn store_crumb(&self, crumb: Option<String>) {
        if let Ok(mut guard) = self.crumb.lock() {
            *guard = crumb;
        }
    }

    /// Establish a session cookie and fetch the crumb bound to it.
    async fn crumb(&self) -> Result<String, CoreError> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        // fc.yahoo.com answers 404 but still sets the session cookie.
        self.client.get(COOKIE_URL).send().await?;

        let crumb = self
            .client
            .get(CRUMB_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?
            .trim()
            .to_string();

        if crumb.is_empty() || crumb.contains('<') {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: "Crumb handshake returned no usable crumb".into(),
            });
        }

        self.store_crumb(Some(crumb.clone()));
        Ok(crumb)
    }
}

// ── quoteSummary response types ─────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<QuoteSummaryError>,
}

#[derive(Deserialize)]
struct QuoteSummaryError {
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    summary_detail: Option<SummaryDetail>,
    financial_data: Option<FinancialData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    debt_to_equity: Option<RawValue>,
    profit_margins: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 12.3, "fmt": "12.30"}`; missing values
/// come back as `{}`.
#[derive(Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<PriceSeries, CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", period.as_str())
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch {period} history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        Ok(PriceSeries::new(symbol, bars))
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, CoreError> {
        let crumb = self.crumb().await?;
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("modules", "summaryDetail,financialData"),
                ("crumb", crumb.as_str()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Crumb expired; the next call performs a fresh handshake.
            self.store_crumb(None);
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Crumb rejected while fetching fundamentals for {symbol}"),
            });
        }

        let resp: QuoteSummaryResponse = response.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse fundamentals for {symbol}: {e}"),
        })?;

        if let Some(err) = resp.quote_summary.error {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!(
                    "quoteSummary error for {symbol}: {}",
                    err.description.unwrap_or_else(|| "unknown".into())
                ),
            });
        }

        let result = resp
            .quote_summary
            .result
            .and_then(|mut results| results.pop())
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No fundamentals returned for {symbol}"),
            })?;

        let trailing_pe = result.summary_detail.and_then(|d| raw(d.trailing_pe));
        let (debt_to_equity, profit_margin) = match result.financial_data {
            Some(f) => (raw(f.debt_to_equity), raw(f.profit_margins)),
            None => (None, None),
        };

        Ok(FundamentalsSnapshot::new(
            trailing_pe,
            debt_to_equity,
            profit_margin,
        ))
    }
}
