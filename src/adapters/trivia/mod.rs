//! Trivia Adapters
//!
//! Implementations of the QuestionSource port.
//!
//! - **OpenTdbQuestionSource** - Open Trivia Database over HTTP
//! - **MockQuestionSource** - Prepared questions (testing/development)

mod mock_source;
mod opentdb_source;

pub use mock_source::MockQuestionSource;
pub use opentdb_source::{OpenTdbConfig, OpenTdbQuestionSource};
