//! Error types for the quiz domain

use crate::ports::QuestionSourceError;

/// Errors a policy turn can end with.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum QuizError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Question source unavailable: {0}")]
    SourceUnavailable(#[from] QuestionSourceError),

    /// A question was requested before every slot was set.
    #[error("Configuration incomplete")]
    ConfigurationIncomplete,
}

impl QuizError {
    /// Returns true if the host may re-prompt and retry the same turn.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SourceUnavailable(source) => source.is_retryable(),
            Self::MalformedInput(_) | Self::ConfigurationIncomplete => false,
        }
    }
}
