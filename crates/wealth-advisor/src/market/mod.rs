//! Market Data
//!
//! Price-history sources for the growth-rate estimator.

mod mock;
mod yahoo;

pub use mock::MockPriceHistory;
pub use yahoo::YahooHistoryClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::PriceSeries;

/// Historical price source (Strategy pattern)
///
/// Implementations return daily observations oldest first. "No data" is an
/// empty series, not an error; errors are reserved for transport and
/// decoding failures.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Daily history for `symbol` covering the last `lookback_days`
    async fn history(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries>;

    /// Source name
    fn name(&self) -> &str;
}
