//! Mock Price History
//!
//! Static series for tests and offline runs.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use super::PriceHistorySource;
use crate::error::{AdvisorError, Result};
use crate::model::{AssetClass, PricePoint, PriceSeries};

/// In-memory price history keyed by ticker
#[derive(Default)]
pub struct MockPriceHistory {
    series: HashMap<String, Vec<PricePoint>>,
    failing: HashSet<String>,
}

impl MockPriceHistory {
    /// Empty source: every ticker has no data
    pub fn new() -> Self {
        Self::default()
    }

    /// Smooth synthetic histories for the three benchmark tickers
    ///
    /// Annual growth: equity 12%, debt 7%, gold 9%.
    pub fn with_benchmarks() -> Self {
        let today = Utc::now().date_naive();
        [
            (AssetClass::Equity, 18_000.0, 0.12),
            (AssetClass::Debt, 900.0, 0.07),
            (AssetClass::Gold, 45.0, 0.09),
        ]
        .into_iter()
        .fold(Self::new(), |mock, (asset, start, rate)| {
            mock.with_series(asset.benchmark_ticker(), yearly_points(today, start, rate, 5))
        })
    }

    #[must_use]
    pub fn with_series(mut self, symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        self.series.insert(symbol.into(), points);
        self
    }

    /// Make `symbol` return a transport-style error
    #[must_use]
    pub fn failing(mut self, symbol: impl Into<String>) -> Self {
        self.failing.insert(symbol.into());
        self
    }
}

/// One observation per year, oldest first, ending at `end`
fn yearly_points(end: NaiveDate, start_price: f64, annual_rate: f64, years: u32) -> Vec<PricePoint> {
    (0..=years)
        .map(|i| {
            let back = i64::from(years - i) * 365;
            let price = start_price * (1.0 + annual_rate).powf(f64::from(i));
            PricePoint::new(end - Duration::days(back), price, Some(price))
        })
        .collect()
}

#[async_trait]
impl PriceHistorySource for MockPriceHistory {
    async fn history(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries> {
        if self.failing.contains(symbol) {
            return Err(AdvisorError::MarketData {
                symbol: symbol.to_string(),
                message: "mock failure".into(),
            });
        }

        let cutoff = Utc::now().date_naive() - Duration::days(i64::from(lookback_days));
        let points = self
            .series
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(PriceSeries::new(symbol, points))
    }

    fn name(&self) -> &str {
        "MockPriceHistory"
    }
}
