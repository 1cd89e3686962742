//! Open Trivia Database source - Implementation of QuestionSource over HTTP.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenTdbConfig::new()
//!     .with_base_url("https://opentdb.com")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_max_fetch_attempts(25);
//!
//! let source = OpenTdbQuestionSource::new(config)?;
//! ```
//!
//! Each fetch is `GET {base_url}/api.php?amount=1&type=..` with optional
//! `difficulty` and `category` filters. Duplicates are redrawn up to
//! `max_fetch_attempts` times.

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::quiz::{assign_letter_keys, pick_category_id, Question, QuizType};
use crate::ports::{QuestionQuery, QuestionSource, QuestionSourceError};

/// Configuration for the Open Trivia Database source.
#[derive(Debug, Clone)]
pub struct OpenTdbConfig {
    /// Base URL for the API (default: https://opentdb.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Draws allowed per fetch before giving up on finding an unseen question.
    pub max_fetch_attempts: u32,
}

impl Default for OpenTdbConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenTdbConfig {
    pub fn new() -> Self {
        Self {
            base_url: "https://opentdb.com".to_string(),
            timeout: Duration::from_secs(10),
            max_fetch_attempts: 25,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the draw limit per fetch.
    pub fn with_max_fetch_attempts(mut self, attempts: u32) -> Self {
        self.max_fetch_attempts = attempts;
        self
    }
}

/// Question source backed by the Open Trivia Database.
pub struct OpenTdbQuestionSource {
    config: OpenTdbConfig,
    client: Client,
}

impl OpenTdbQuestionSource {
    /// Creates a source with the given configuration.
    pub fn new(config: OpenTdbConfig) -> Result<Self, QuestionSourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QuestionSourceError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!("{}/api.php", self.config.base_url.trim_end_matches('/'))
    }

    /// Performs one provider request and converts the single result.
    async fn draw(&self, query: &QuestionQuery) -> Result<Question, QuestionSourceError> {
        let params = {
            let mut rng = rand::thread_rng();
            query_params(query, pick_category_id(&mut rng, query.category))
        };

        let response = self
            .client
            .get(self.api_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QuestionSourceError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    QuestionSourceError::network(format!("Connection failed: {}", e))
                } else {
                    QuestionSourceError::network(e.to_string())
                }
            })?;

        let body: OpenTdbResponse = handle_response_status(response)
            .await?
            .json()
            .await
            .map_err(|e| {
                body_error(
                    e.is_timeout(),
                    e.is_decode(),
                    self.config.timeout.as_secs(),
                    &e,
                )
            })?;

        let mut rng = rand::thread_rng();
        into_question(body, query.quiz_type, &mut rng)
    }
}

#[async_trait]
impl QuestionSource for OpenTdbQuestionSource {
    async fn fetch_question(
        &self,
        query: &QuestionQuery,
        excluding: &HashSet<String>,
    ) -> Result<Question, QuestionSourceError> {
        draw_unseen(self.config.max_fetch_attempts, excluding, || self.draw(query)).await
    }
}

/// Redraws until a question outside `excluding` comes back.
async fn draw_unseen<F, Fut>(
    max_attempts: u32,
    excluding: &HashSet<String>,
    mut draw: F,
) -> Result<Question, QuestionSourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Question, QuestionSourceError>>,
{
    for attempt in 1..=max_attempts {
        debug!(attempt, max_attempts, "fetching trivia question");
        let question = draw().await?;
        if !excluding.contains(&question.text) {
            return Ok(question);
        }
        debug!(attempt, question = %question.text, "duplicate question, drawing again");
    }

    warn!(attempts = max_attempts, "no unseen question found");
    Err(QuestionSourceError::Exhausted {
        attempts: max_attempts,
    })
}

fn query_params(query: &QuestionQuery, category_id: Option<u32>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("amount", "1".to_string()),
        ("type", query.quiz_type.provider_value().to_string()),
    ];
    if let Some(level) = query.difficulty.provider_value() {
        params.push(("difficulty", level.to_string()));
    }
    if let Some(id) = category_id {
        params.push(("category", id.to_string()));
    }
    params
}

/// Classifies a failure while reading the response body.
fn body_error(
    timed_out: bool,
    malformed: bool,
    timeout_secs: u64,
    detail: &dyn std::fmt::Display,
) -> QuestionSourceError {
    if timed_out {
        QuestionSourceError::Timeout { timeout_secs }
    } else if malformed {
        QuestionSourceError::parse(format!("Failed to parse response: {}", detail))
    } else {
        QuestionSourceError::network(format!("Failed to read response: {}", detail))
    }
}

async fn handle_response_status(response: Response) -> Result<Response, QuestionSourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(QuestionSourceError::unavailable(format!(
        "Unexpected status {}: {}",
        status, error_body
    )))
}

fn into_question<R: Rng + ?Sized>(
    body: OpenTdbResponse,
    quiz_type: QuizType,
    rng: &mut R,
) -> Result<Question, QuestionSourceError> {
    match body.response_code {
        0 => {}
        // Not enough questions for the filter, or rate limited.
        1 | 5 => {
            return Err(QuestionSourceError::unavailable(format!(
                "provider response code {}",
                body.response_code
            )))
        }
        code => return Err(QuestionSourceError::parse(format!("provider response code {}", code))),
    }

    let result = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| QuestionSourceError::parse("No results in response"))?;

    match quiz_type {
        QuizType::Boolean => {
            let correct = match result.correct_answer.trim() {
                "True" => true,
                "False" => false,
                other => {
                    return Err(QuestionSourceError::parse(format!(
                        "expected True or False, got '{}'",
                        other
                    )))
                }
            };
            Ok(Question::boolean(&result.question, correct))
        }
        QuizType::MultipleChoice => assign_letter_keys(
            rng,
            &result.question,
            &result.correct_answer,
            &result.incorrect_answers,
        )
        .map_err(|e| QuestionSourceError::parse(e.to_string())),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Open Trivia Database API types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct OpenTdbResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<OpenTdbResult>,
}

#[derive(Debug, Deserialize)]
struct OpenTdbResult {
    question: String,
    correct_answer: String,
    #[serde(default)]
    incorrect_answers: Vec<String>,
}
