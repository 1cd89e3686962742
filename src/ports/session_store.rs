//! Session Store Port - Interface for persisting quiz sessions.
//!
//! The host keeps one [`QuizSession`] per session id between turns.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::quiz::QuizSession;

/// Errors that can occur during session store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Port for persisting and loading quiz sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, or `None` if the id has never been saved.
    async fn load(&self, id: SessionId) -> Result<Option<QuizSession>, SessionStoreError>;

    /// Insert or replace a session.
    async fn save(&self, session: &QuizSession) -> Result<(), SessionStoreError>;

    /// Remove a session.
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no session exists
    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError>;

    /// Number of stored sessions.
    async fn count(&self) -> Result<usize, SessionStoreError>;
}
