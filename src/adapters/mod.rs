//! Adapters - Implementations of port interfaces.
//!
//! - `trivia` - Question sources (Open Trivia Database, mock)
//! - `storage` - Session stores (in-memory)

pub mod storage;
pub mod trivia;

pub use storage::InMemorySessionStore;
pub use trivia::{MockQuestionSource, OpenTdbConfig, OpenTdbQuestionSource};
