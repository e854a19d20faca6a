//! # agent-core
//!
//! Provider-agnostic LLM abstraction and session storage for the wealth
//! advisor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     advisor-server                          │
//! │  ┌─────────────┐  ┌─────────────────┐  ┌─────────────────┐  │
//! │  │  Advisory   │──│   LlmProvider   │  │  SessionStore   │  │
//! │  │  prompts    │  │   (Strategy)    │  │   (Q&A, ratings)│  │
//! │  └─────────────┘  └─────────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping chat-completion backends without
//! changing advisory logic.

pub mod error;
pub mod message;
pub mod provider;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use session::{MemorySessionStore, Session, SessionId, SessionStore};
