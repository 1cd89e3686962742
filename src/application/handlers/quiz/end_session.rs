//! EndSession command handler.
//!
//! Drops a session so the next turn with the same id starts a fresh game.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// Command to end a quiz session.
#[derive(Debug, Clone, Copy)]
pub struct EndSessionCommand {
    pub session_id: SessionId,
}

/// Errors that can occur when ending a session.
#[derive(Debug, Clone, Error)]
pub enum EndSessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<SessionStoreError> for EndSessionError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => EndSessionError::NotFound(id),
            other => EndSessionError::Storage(other.to_string()),
        }
    }
}

/// Handler for ending quiz sessions.
pub struct EndSessionHandler<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> EndSessionHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: EndSessionCommand) -> Result<(), EndSessionError> {
        self.store.delete(cmd.session_id).await?;
        debug!(session_id = %cmd.session_id, "quiz session ended");
        Ok(())
    }
}
