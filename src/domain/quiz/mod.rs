//! Quiz domain - configuration, questions and the dialog policy.
//!
//! A session moves through [`QuizPhase`]s. Each user turn arrives as a
//! [`BeliefState`]; [`QuizPolicy::next_acts`] answers with an ordered list of
//! [`SysAct`]s and updates the game state.

mod belief_state;
mod config;
mod errors;
mod phase;
mod policy;
mod question;
mod round;
mod session;
mod sys_act;

pub use belief_state::{BeliefState, TurnRequest, UserActType};
pub use config::{
    Category, CompleteConfig, Difficulty, GameConfig, LengthKind, QuizLength, QuizType, Slot,
};
pub use errors::QuizError;
pub use phase::QuizPhase;
pub use policy::{fixed_length, QuizPolicy};
pub use question::{
    assign_letter_keys, normalize_question_text, pick_category_id, Answers, LetterKey, Question,
};
pub use round::RoundState;
pub use session::QuizSession;
pub use sys_act::{CorrectAnswerText, GivenAnswer, SysAct};
