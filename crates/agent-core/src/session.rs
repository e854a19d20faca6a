//! Session Management
//!
//! Follow-up question history and feedback for one advisory session.
//! Handlers never hold session state themselves: they load a `Session` from
//! a `SessionStore`, operate on the value, and save it back.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::message::Conversation;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User feedback left at the end of a session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: String,
    pub received_at: DateTime<Utc>,
}

/// A complete advisory session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,

    /// Follow-up questions and answers
    pub conversation: Conversation,

    /// Display name of the person using the session, if given
    pub user_name: Option<String>,

    pub feedback: Option<Feedback>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            conversation: Conversation::new(),
            user_name: None,
            feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            ..Self::new()
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Record a follow-up question and the answer it received
    pub fn record_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.conversation.record_exchange(question, answer);
        self.touch();
    }

    pub fn set_feedback(&mut self, rating: impl Into<String>) {
        self.feedback = Some(Feedback {
            rating: rating.into(),
            received_at: Utc::now(),
        });
        self.touch();
    }

    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }

    /// No activity since `cutoff`
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at < cutoff
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session store interface
///
/// Persistence is a collaborator concern; implementations may be backed by
/// anything that can hold serialized sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &Session) -> Result<()>;

    async fn load(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Remove a session; returns whether it existed
    async fn delete(&self, id: &SessionId) -> Result<bool>;

    async fn len(&self) -> usize;

    /// Drop sessions untouched for longer than `max_idle`; returns how many
    async fn purge_idle(&self, max_idle: Duration) -> Result<usize>;
}

/// In-memory session store (for development/testing)
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        tracing::debug!(session = %session.id, messages = session.message_count(), "Session saved");
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn purge_idle(&self, max_idle: Duration) -> Result<usize> {
        // A window too long for chrono expires nothing
        let Some(cutoff) = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return Ok(0);
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle_since(cutoff));
        let purged = before - sessions.len();

        if purged > 0 {
            tracing::debug!(purged, remaining = sessions.len(), "Idle sessions purged");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert_eq!(session.message_count(), 0);
        assert!(session.feedback.is_none());
    }

    #[test]
    fn test_session_id_serializes_as_string() {
        let id = SessionId::from_string("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        let mut session = Session::new();
        session.record_answer("Why 10% gold?", "Diversification.");
        let id = session.id.clone();

        store.save(&session).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.conversation.last_answer(), Some("Diversification."));
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemorySessionStore::new();
        let session = Session::new();
        store.save(&session).await.unwrap();

        assert!(store.delete(&session.id).await.unwrap());
        assert!(!store.delete(&session.id).await.unwrap());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_purge_idle_keeps_active_sessions() {
        let store = MemorySessionStore::new();

        let mut stale = Session::new();
        stale.updated_at = Utc::now() - chrono::Duration::hours(2);
        let active = Session::new();
        store.save(&stale).await.unwrap();
        store.save(&active).await.unwrap();

        let purged = store.purge_idle(Duration::from_secs(3600)).await.unwrap();
        assert_eq!(purged, 1);
        assert!(store.load(&stale.id).await.unwrap().is_none());
        assert!(store.load(&active.id).await.unwrap().is_some());

        assert_eq!(store.purge_idle(Duration::MAX).await.unwrap(), 0);
        assert_eq!(store.len().await, 1);
    }
}
