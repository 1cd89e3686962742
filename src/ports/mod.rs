//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `QuestionSource` - Trivia question bank queried once per advancing turn
//! - `SessionStore` - Persistence for quiz sessions between turns

mod question_source;
mod session_store;

pub use question_source::{QuestionQuery, QuestionSource, QuestionSourceError};
pub use session_store::{SessionStore, SessionStoreError};
