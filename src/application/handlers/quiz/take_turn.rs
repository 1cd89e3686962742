//! TakeTurn command handler.
//!
//! Runs one dialog turn for a session: load (or create), run the policy,
//! save. Turns for the same session are serialized; different sessions run
//! concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::foundation::SessionId;
use crate::domain::quiz::{BeliefState, QuizError, QuizPhase, QuizSession, SysAct};
use crate::ports::{QuestionSource, QuestionSourceError, SessionStore, SessionStoreError};

/// Command to process one user turn.
#[derive(Debug, Clone)]
pub struct TakeTurnCommand {
    /// Session the turn belongs to; unknown ids start a new game.
    pub session_id: SessionId,
    /// Output of language understanding for this turn.
    pub belief_state: BeliefState,
}

impl TakeTurnCommand {
    pub fn new(session_id: SessionId, belief_state: BeliefState) -> Self {
        Self {
            session_id,
            belief_state,
        }
    }
}

/// Errors that can occur when taking a turn.
#[derive(Debug, Clone, Error)]
pub enum TakeTurnError {
    /// The question source failed; the stored session is unchanged.
    #[error("Question source unavailable: {0}")]
    SourceUnavailable(QuestionSourceError),

    /// Session store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invariant violation inside the policy.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TakeTurnError {
    /// Returns true if the host should re-prompt and let the user try again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SourceUnavailable(source) => source.is_retryable(),
            Self::Storage(_) | Self::Internal(_) => false,
        }
    }
}

impl From<QuizError> for TakeTurnError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::SourceUnavailable(source) => TakeTurnError::SourceUnavailable(source),
            other => TakeTurnError::Internal(other.to_string()),
        }
    }
}

impl From<SessionStoreError> for TakeTurnError {
    fn from(err: SessionStoreError) -> Self {
        TakeTurnError::Storage(err.to_string())
    }
}

/// Result of a successful turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeTurnResult {
    pub session_id: SessionId,
    /// Acts to render, in utterance order.
    pub acts: Vec<SysAct>,
    pub phase: QuizPhase,
    pub count: u32,
    pub score: u32,
}

/// Handler for taking dialog turns.
pub struct TakeTurnHandler<S, Q>
where
    S: SessionStore,
    Q: QuestionSource,
{
    store: Arc<S>,
    source: Arc<Q>,
    session_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl<S, Q> TakeTurnHandler<S, Q>
where
    S: SessionStore + 'static,
    Q: QuestionSource + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>, source: Arc<Q>) -> Self {
        Self {
            store,
            source,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn session_lock(&self, id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().await;
        locks.entry(id).or_default().clone()
    }

    /// Drops lock entries that no in-flight turn holds.
    async fn release_idle_locks(&self) {
        let mut locks = self.session_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.session_locks.lock().await.len()
    }

    /// Handles a take turn command.
    #[tracing::instrument(skip(self, cmd), fields(session_id = %cmd.session_id))]
    pub async fn handle(&self, cmd: TakeTurnCommand) -> Result<TakeTurnResult, TakeTurnError> {
        let lock = self.session_lock(cmd.session_id).await;
        let outcome = {
            let _guard = lock.lock().await;
            self.run_turn(cmd).await
        };
        drop(lock);
        self.release_idle_locks().await;
        outcome
    }

    async fn run_turn(&self, cmd: TakeTurnCommand) -> Result<TakeTurnResult, TakeTurnError> {
        let mut session = match self.store.load(cmd.session_id).await? {
            Some(session) => session,
            None => {
                debug!("starting new quiz session");
                QuizSession::new(cmd.session_id)
            }
        };

        let acts = match session.take_turn(&cmd.belief_state, self.source.as_ref()).await {
            Ok(acts) => acts,
            Err(err) => {
                warn!(error = %err, "turn failed, session left unchanged");
                return Err(err.into());
            }
        };

        self.store.save(&session).await?;
        debug!(acts = acts.len(), phase = session.phase().label(), "turn complete");

        Ok(TakeTurnResult {
            session_id: session.id(),
            acts,
            phase: session.phase(),
            count: session.count(),
            score: session.score(),
        })
    }
}
