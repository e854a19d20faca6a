//! Application State

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, SessionStore};
use wealth_advisor::{Advisor, GrowthEstimator, PriceHistorySource};

use crate::config::ServerConfig;

/// Shared application state
///
/// Handlers are stateless; everything per-user lives in the session store.
#[derive(Clone)]
pub struct AppState {
    /// Chat-completion backend (OpenRouter)
    pub provider: Arc<dyn LlmProvider>,

    /// Model and sampling settings for every advisory request
    pub generation: GenerationOptions,

    pub prices: Arc<dyn PriceHistorySource>,

    /// Follow-up Q&A and ratings, keyed by session id
    pub sessions: Arc<dyn SessionStore>,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        prices: Arc<dyn PriceHistorySource>,
        sessions: Arc<dyn SessionStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            provider,
            generation: GenerationOptions::default(),
            prices,
            sessions,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }

    pub fn advisor(&self) -> Advisor {
        Advisor::new(self.provider.clone()).with_options(self.generation.clone())
    }

    pub fn growth_estimator(&self, lookback_years: u32) -> GrowthEstimator {
        GrowthEstimator::new(self.prices.clone()).with_lookback_years(lookback_years)
    }
}
