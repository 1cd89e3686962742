//! Belief state handed to the policy by the language-understanding layer.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Intent tag recognized in the user's utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserActType {
    /// The utterance could not be classified.
    Bad,
    Bye,
    /// Declines to customize the quiz.
    Deny,
    Confirm,
    Inform,
    Request,
    None,
}

/// What the user asked for this turn, derived from the raw `requests` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRequest {
    Empty,
    Score,
    /// An answer token, trimmed and lowercased.
    Answer(String),
}

/// Structured summary of the current user turn.
///
/// Every field defaults to empty so partial input deserializes cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefState {
    pub user_acts: HashSet<UserActType>,
    /// Slot name to raw value.
    pub informs: HashMap<String, String>,
    /// `score`, an answer token, or nothing.
    pub requests: Option<String>,
}

impl BeliefState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_act(mut self, act: UserActType) -> Self {
        self.user_acts.insert(act);
        self
    }

    pub fn with_inform(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.informs.insert(slot.into(), value.into());
        self.user_acts.insert(UserActType::Inform);
        self
    }

    pub fn with_request(mut self, request: impl Into<String>) -> Self {
        self.requests = Some(request.into());
        self.user_acts.insert(UserActType::Request);
        self
    }

    /// Shorthand for a belief state carrying an answer token.
    pub fn answer(token: impl Into<String>) -> Self {
        Self::new().with_request(token)
    }

    pub fn has_act(&self, act: UserActType) -> bool {
        self.user_acts.contains(&act)
    }

    /// True when no intent at all was recognized.
    pub fn is_silent(&self) -> bool {
        self.user_acts.is_empty()
    }

    pub fn request(&self) -> TurnRequest {
        match self.requests.as_deref().map(str::trim) {
            None | Some("") => TurnRequest::Empty,
            Some(token) if token.eq_ignore_ascii_case("score") => TurnRequest::Score,
            Some(token) => TurnRequest::Answer(token.to_ascii_lowercase()),
        }
    }
}
