//! Per-session round bookkeeping.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::question::Question;

/// Score, question count and question history for one session.
///
/// Invariant: `score <= count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Questions asked so far.
    pub count: u32,
    /// Correct answers so far.
    pub score: u32,
    /// The question awaiting an answer.
    pub current_question: Option<Question>,
    /// Texts already served this session. Append-only.
    pub asked_questions: HashSet<String>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `question` the pending one and records it as asked.
    pub fn serve(&mut self, question: Question) {
        self.asked_questions.insert(question.text.clone());
        self.current_question = Some(question);
    }

    /// Counts one more question against the round.
    pub fn record_question(&mut self) {
        self.count += 1;
    }

    /// Credits a correct answer.
    pub fn record_correct(&mut self) {
        self.score += 1;
        debug_assert!(self.score <= self.count);
    }

    pub fn has_pending_question(&self) -> bool {
        self.current_question.is_some()
    }

    /// Text of the pending question.
    pub fn current_text(&self) -> Option<&str> {
        self.current_question.as_ref().map(|q| q.text.as_str())
    }
}
