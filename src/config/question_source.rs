//! Question source configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::OpenTdbConfig;

/// Trivia question provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSourceConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Draws allowed per fetch before giving up on an unseen question
    #[serde(default = "default_max_fetch_attempts")]
    pub max_fetch_attempts: u32,
}

impl QuestionSourceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Adapter configuration for the Open Trivia Database source
    pub fn to_opentdb_config(&self) -> OpenTdbConfig {
        OpenTdbConfig::new()
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .with_max_fetch_attempts(self.max_fetch_attempts)
    }

    /// Validate question source configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("QUESTION_SOURCE__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidSourceUrl);
        }
        if !(1..=120).contains(&self.timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_fetch_attempts == 0 {
            return Err(ValidationError::InvalidFetchAttempts);
        }
        Ok(())
    }
}

impl Default for QuestionSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_fetch_attempts: default_max_fetch_attempts(),
        }
    }
}

fn default_base_url() -> String {
    "https://opentdb.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_fetch_attempts() -> u32 {
    25
}
