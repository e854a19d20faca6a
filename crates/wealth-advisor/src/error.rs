//! Error Types for Wealth Advisor

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Invalid investment plan: {0}")]
    InvalidPlan(String),

    #[error("Unknown risk level: {0} (expected Low, Medium or High)")]
    UnknownRiskLevel(String),

    #[error("Unknown rating: {0}")]
    UnknownRating(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Market data error for {symbol}: {message}")]
    MarketData { symbol: String, message: String },

    #[error("Report rendering failed: {0}")]
    Report(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Text-generation failures pass through untouched
    #[error(transparent)]
    Agent(#[from] AgentError),
}
