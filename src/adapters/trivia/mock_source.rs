//! Mock Question Source for testing.
//!
//! Serves prepared questions without touching the network.
//!
//! # Features
//!
//! - A pool of prepared questions, served first-unseen
//! - Error injection for failure handling
//! - Simulated latency
//! - Call tracking for "exactly N fetches" assertions
//!
//! # Example
//!
//! ```ignore
//! let source = MockQuestionSource::new()
//!     .with_question(Question::boolean("The sun is a star", true))
//!     .with_error(QuestionSourceError::network("connection reset"));
//! ```

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::quiz::Question;
use crate::ports::{QuestionQuery, QuestionSource, QuestionSourceError};

/// Mock question source for testing.
#[derive(Debug, Clone)]
pub struct MockQuestionSource {
    /// Prepared questions, in serving order.
    pool: Arc<Mutex<Vec<Question>>>,
    /// Errors returned by the next calls, in order.
    errors: Arc<Mutex<VecDeque<QuestionSourceError>>>,
    /// Simulated latency per fetch.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<QuestionQuery>>>,
}

impl Default for MockQuestionSource {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockQuestionSource {
    /// Creates a mock with an empty pool.
    pub fn new() -> Self {
        Self {
            pool: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a question to the pool.
    pub fn with_question(self, question: Question) -> Self {
        lock(&self.pool).push(question);
        self
    }

    /// Adds several questions to the pool.
    pub fn with_questions(self, questions: impl IntoIterator<Item = Question>) -> Self {
        lock(&self.pool).extend(questions);
        self
    }

    /// Makes the next call fail with `error`.
    pub fn with_error(self, error: QuestionSourceError) -> Self {
        lock(&self.errors).push_back(error);
        self
    }

    /// Sets simulated latency per fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of fetches made, failed ones included.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded queries.
    pub fn get_calls(&self) -> Vec<QuestionQuery> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl QuestionSource for MockQuestionSource {
    async fn fetch_question(
        &self,
        query: &QuestionQuery,
        excluding: &HashSet<String>,
    ) -> Result<Question, QuestionSourceError> {
        lock(&self.calls).push(*query);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if let Some(error) = lock(&self.errors).pop_front() {
            return Err(error);
        }

        let pool = lock(&self.pool);
        let candidates: Vec<&Question> = pool
            .iter()
            .filter(|q| q.quiz_type == query.quiz_type)
            .collect();
        candidates
            .iter()
            .find(|q| !excluding.contains(&q.text))
            .map(|q| (*q).clone())
            .ok_or(QuestionSourceError::Exhausted {
                attempts: candidates.len() as u32,
            })
    }
}
