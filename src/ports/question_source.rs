//! Question Source Port - Interface for trivia question banks.
//!
//! The policy asks this port for exactly one question per advancing turn.
//! Implementations are responsible for novelty: the returned question's text
//! must not be in the caller's `excluding` set.
//!
//! # Novelty loop
//!
//! Adapters retry a provider until they get an unseen question, but the loop
//! is bounded. Once `max_fetch_attempts` draws have all been duplicates the
//! adapter gives up with [`QuestionSourceError::Exhausted`] instead of
//! stalling the session.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::quiz::{Category, CompleteConfig, Difficulty, Question, QuizType};

/// Port for fetching quiz questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch one question matching `query` whose text is not in `excluding`.
    async fn fetch_question(
        &self,
        query: &QuestionQuery,
        excluding: &HashSet<String>,
    ) -> Result<Question, QuestionSourceError>;
}

/// Filter constraints for a question fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionQuery {
    pub difficulty: Difficulty,
    pub quiz_type: QuizType,
    pub category: Category,
}

impl QuestionQuery {
    pub fn new(difficulty: Difficulty, quiz_type: QuizType, category: Category) -> Self {
        Self {
            difficulty,
            quiz_type,
            category,
        }
    }
}

impl From<&CompleteConfig> for QuestionQuery {
    fn from(config: &CompleteConfig) -> Self {
        Self::new(config.difficulty, config.quiz_type, config.category)
    }
}

/// Question source errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionSourceError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Provider answered but could not serve a question.
    #[error("question source unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Every draw was a question already asked this session.
    #[error("no unseen question after {attempts} attempts")]
    Exhausted {
        /// Number of draws made.
        attempts: u32,
    },
}

impl QuestionSourceError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying the same fetch may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout { .. } | Self::Unavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quiz::{GameConfig, QuizLength};

    #[test]
    fn query_is_built_from_complete_config() {
        let config = GameConfig::defaults().complete().unwrap();
        let query = QuestionQuery::from(&config);
        assert_eq!(query.difficulty, Difficulty::Easy);
        assert_eq!(query.quiz_type, QuizType::Boolean);
        assert_eq!(query.category, Category::General);
        assert_eq!(config.length, QuizLength::Unbounded);
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(QuestionSourceError::network("reset").is_retryable());
        assert!(QuestionSourceError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(QuestionSourceError::unavailable("503").is_retryable());
    }

    #[test]
    fn exhaustion_and_parse_errors_are_not_retryable() {
        assert!(!QuestionSourceError::Exhausted { attempts: 3 }.is_retryable());
        assert!(!QuestionSourceError::parse("bad json").is_retryable());
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = QuestionSourceError::Exhausted { attempts: 25 };
        assert_eq!(err.to_string(), "no unseen question after 25 attempts");
    }
}
