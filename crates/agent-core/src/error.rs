//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable or failing server-side
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Response could not be interpreted (e.g., no choices returned)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(String),

    /// Session id not present in the store
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited by the provider
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Whether a caller could reasonably try the same request again.
    ///
    /// Nothing in this workspace retries automatically; the flag is exposed
    /// so callers can phrase their error messages.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::RateLimited(_) | Self::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The advisory service returned an error: {msg}"),
            Self::ProviderUnavailable(_) => {
                "The advisory service is currently unavailable. Please try again.".into()
            }
            Self::Parse(_) => "The advisory service sent a response we could not read.".into(),
            Self::SessionNotFound(id) => format!("Session '{id}' does not exist."),
            Self::RateLimited(_) => "Too many requests. Please wait a moment.".into(),
            Self::Auth(_) => "The advisory service rejected our credentials.".into(),
            Self::Config(msg) => format!("The server is misconfigured: {msg}"),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(AgentError::RateLimited("slow down".into()).is_retryable());
        assert!(AgentError::ProviderUnavailable("502".into()).is_retryable());
        assert!(!AgentError::Auth("bad key".into()).is_retryable());
        assert!(!AgentError::Parse("no choices".into()).is_retryable());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AgentError::Auth("sk-or-123 rejected".into());
        assert!(!err.user_message().contains("sk-or"));
    }
}
