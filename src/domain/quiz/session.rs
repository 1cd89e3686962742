//! Quiz session aggregate.

use serde::{Deserialize, Serialize};

use super::belief_state::BeliefState;
use super::errors::QuizError;
use super::phase::QuizPhase;
use super::policy::QuizPolicy;
use super::sys_act::SysAct;
use crate::domain::foundation::SessionId;
use crate::ports::QuestionSource;

/// One user's quiz game, keyed by session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    id: SessionId,
    policy: QuizPolicy,
}

impl QuizSession {
    /// Starts a fresh game that opens with a welcome.
    pub fn new(id: SessionId) -> Self {
        Self::with_policy(id, QuizPolicy::new())
    }

    pub fn with_policy(id: SessionId, policy: QuizPolicy) -> Self {
        Self { id, policy }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn policy(&self) -> &QuizPolicy {
        &self.policy
    }

    pub fn phase(&self) -> QuizPhase {
        self.policy.phase()
    }

    pub fn count(&self) -> u32 {
        self.policy.round().count
    }

    pub fn score(&self) -> u32 {
        self.policy.round().score
    }

    pub fn is_finished(&self) -> bool {
        !self.phase().is_live()
    }

    /// Runs one dialog turn against this session's game state.
    pub async fn take_turn(
        &mut self,
        belief: &BeliefState,
        source: &dyn QuestionSource,
    ) -> Result<Vec<SysAct>, QuizError> {
        self.policy.next_acts(belief, source).await
    }
}
