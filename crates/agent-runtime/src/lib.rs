//! # agent-runtime
//!
//! Runtime providers for the wealth advisor.
//!
//! ## Providers
//!
//! - **OpenRouter** (default): any model behind OpenRouter's
//!   OpenAI-compatible chat-completions API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenRouterProvider;
//!
//! let provider = Arc::new(OpenRouterProvider::from_env()?);
//! let advisor = Advisor::new(provider);
//! ```

#[cfg(feature = "openrouter")]
pub mod openrouter;

#[cfg(feature = "openrouter")]
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, GenerationOptions, LlmProvider, Message, Result, Role};
