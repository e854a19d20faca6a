//! Yahoo Finance chart API client
//!
//! Daily history from `query1.finance.yahoo.com/v8/finance/chart`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::PriceHistorySource;
use crate::error::{AdvisorError, Result};
use crate::model::{PricePoint, PriceSeries};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    #[serde(default)]
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance daily-history client
#[derive(Debug, Clone)]
pub struct YahooHistoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooHistoryClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Point at a different chart endpoint (e.g. a caching proxy)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, symbol: &str, start: i64, end: i64) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=div%2Csplit",
            self.base_url,
            symbol.replace('^', "%5E"),
            start,
            end
        )
    }

    /// Decode a chart response; rows without a close are skipped
    fn parse_response(symbol: &str, body: &str) -> Result<PriceSeries> {
        let envelope: ChartEnvelope = serde_json::from_str(body)?;

        if let Some(error) = envelope.chart.error {
            return Err(AdvisorError::MarketData {
                symbol: symbol.to_string(),
                message: format!("[{}] {}", error.code, error.description),
            });
        }

        let Some(data) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(PriceSeries::empty(symbol));
        };

        let Some(quote) = data.indicators.quote.first() else {
            return Ok(PriceSeries::empty(symbol));
        };
        let adjusted = data
            .indicators
            .adjclose
            .as_ref()
            .and_then(|a| a.first())
            .map(|a| a.adjclose.as_slice())
            .unwrap_or_default();

        let points = data
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let close = quote.close.get(i).copied().flatten()?;
                let date = DateTime::from_timestamp(ts, 0)?.date_naive();
                let adj_close = adjusted.get(i).copied().flatten();
                Some(PricePoint::new(date, close, adj_close))
            })
            .collect();

        Ok(PriceSeries::new(symbol, points))
    }
}

#[async_trait]
impl PriceHistorySource for YahooHistoryClient {
    async fn history(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries> {
        let end = Utc::now();
        let start = end - Duration::days(i64::from(lookback_days));
        let url = self.build_url(symbol, start.timestamp(), end.timestamp());

        tracing::debug!(symbol, lookback_days, "Fetching price history");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let series = Self::parse_response(symbol, &body)?;
        tracing::debug!(symbol, points = series.len(), "Price history received");
        Ok(series)
    }

    fn name(&self) -> &str {
        "YahooFinance"
    }
}
