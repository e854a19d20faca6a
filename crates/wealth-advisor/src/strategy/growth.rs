//! Growth-Rate Estimator
//!
//! Trailing compound annual growth per asset class, measured on each class's
//! benchmark ticker. Missing data never fails the estimate; it yields no
//! value for that asset.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::market::PriceHistorySource;
use crate::model::{AssetClass, PricePoint, PriceSeries};

/// Default trailing window
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;

const DAYS_PER_YEAR: u32 = 365;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn usable_price(point: &PricePoint) -> Option<f64> {
    point.adj_close.filter(|p| p.is_finite() && *p > 0.0)
}

/// CAGR between the first and last observation, as a percentage
///
/// Expects chronological order and does not sort. Returns `None` for an
/// empty series or when either endpoint lacks a usable adjusted close.
pub fn cagr(prices: &[PricePoint], years: f64) -> Option<f64> {
    if !(years.is_finite() && years > 0.0) {
        return None;
    }

    let start = usable_price(prices.first()?)?;
    let end = usable_price(prices.last()?)?;

    let growth = (end / start).powf(1.0 / years) - 1.0;
    growth.is_finite().then(|| round2(growth * 100.0))
}

/// Mean of the present estimates, rounded to two decimals
pub fn average_growth(estimates: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = estimates.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    Some(round2(mean))
}

/// Estimate for one asset class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthEstimate {
    pub asset: AssetClass,

    pub ticker: String,

    /// Annualized growth in percent; `None` when no estimate is available
    pub cagr_percent: Option<f64>,

    /// Observations the estimate was computed from
    pub observations: usize,
}

impl GrowthEstimate {
    pub fn from_series(asset: AssetClass, series: &PriceSeries, years: u32) -> Self {
        Self {
            asset,
            ticker: series.symbol.clone(),
            cagr_percent: cagr(&series.points, f64::from(years)),
            observations: series.len(),
        }
    }
}

/// Estimates for all asset classes plus their average
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    pub lookback_years: u32,

    /// Equity, Debt, Gold order
    pub estimates: Vec<GrowthEstimate>,

    pub average_percent: Option<f64>,
}

impl GrowthReport {
    pub fn new(lookback_years: u32, estimates: Vec<GrowthEstimate>) -> Self {
        let values: Vec<Option<f64>> = estimates.iter().map(|e| e.cagr_percent).collect();
        Self {
            lookback_years,
            average_percent: average_growth(&values),
            estimates,
        }
    }

    pub fn estimate(&self, asset: AssetClass) -> Option<&GrowthEstimate> {
        self.estimates.iter().find(|e| e.asset == asset)
    }

    /// Table of estimates, `n/a` for missing values
    pub fn table(&self) -> String {
        let mut out = format!("{:<8}{:<14}{:>9}\n", "Asset", "Ticker", "CAGR (%)");
        for estimate in &self.estimates {
            let value = estimate
                .cagr_percent
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
            out.push_str(&format!(
                "{:<8}{:<14}{:>9}\n",
                estimate.asset.label(),
                estimate.ticker,
                value
            ));
        }
        if let Some(avg) = self.average_percent {
            out.push_str(&format!("Average CAGR across asset classes: {avg:.2}%\n"));
        }
        out
    }
}

/// Drives a price-history source over the benchmark tickers
pub struct GrowthEstimator {
    source: Arc<dyn PriceHistorySource>,
    lookback_years: u32,
}

impl GrowthEstimator {
    pub fn new(source: Arc<dyn PriceHistorySource>) -> Self {
        Self {
            source,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
        }
    }

    /// A zero-year window yields no estimates
    #[must_use]
    pub fn with_lookback_years(mut self, years: u32) -> Self {
        self.lookback_years = years;
        self
    }

    pub const fn lookback_years(&self) -> u32 {
        self.lookback_years
    }

    /// Fetch one asset class; source failures degrade to an empty series
    pub async fn estimate(&self, asset: AssetClass) -> GrowthEstimate {
        let ticker = asset.benchmark_ticker();
        let lookback_days = self.lookback_years.saturating_mul(DAYS_PER_YEAR);

        let series = match self.source.history(ticker, lookback_days).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(ticker, source = self.source.name(), "Price history unavailable: {}", e);
                PriceSeries::empty(ticker)
            }
        };

        let estimate = GrowthEstimate::from_series(asset, &series, self.lookback_years);
        if estimate.cagr_percent.is_none() {
            tracing::warn!(ticker, observations = series.len(), "No growth estimate");
        }
        estimate
    }

    /// Estimates for every asset class
    pub async fn report(&self) -> GrowthReport {
        let mut estimates = Vec::with_capacity(AssetClass::ALL.len());
        for asset in AssetClass::ALL {
            estimates.push(self.estimate(asset).await);
        }
        GrowthReport::new(self.lookback_years, estimates)
    }
}
