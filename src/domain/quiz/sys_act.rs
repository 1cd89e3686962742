//! System acts produced by the policy.
//!
//! A turn yields an ordered list of acts; the order is the utterance order
//! and the rendering layer must keep it. Optional fields serialize as `null`,
//! which renderers treat as "nothing to say".

use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::{LengthKind, QuizType, Slot};
use super::question::{LetterKey, Question};

/// Whether the user's answer was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GivenAnswer {
    Correct,
    Incorrect,
}

impl GivenAnswer {
    pub fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }
}

/// The right option of a multiple-choice question, e.g. `C) Jupiter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectAnswerText {
    pub key: LetterKey,
    pub text: String,
}

impl fmt::Display for CorrectAnswerText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.key.as_str().to_ascii_uppercase(), self.text)
    }
}

/// One unit of system output intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "act", rename_all = "snake_case")]
pub enum SysAct {
    Welcome,
    Bad,
    Bye,
    Customize {
        slot: Slot,
    },
    TellScore {
        /// `None` until the first question has been asked.
        count: Option<u32>,
        score: u32,
        length: LengthKind,
    },
    TellPreviousQuestion {
        quiz_type: QuizType,
        question: Option<String>,
    },
    TellAnswerOptions {
        a: String,
        b: String,
        c: String,
        d: String,
    },
    TellFirstQuestion {
        question: String,
        quiz_type: QuizType,
    },
    TellGivenAnswer {
        given_answer: GivenAnswer,
    },
    TellCorrectAnswer {
        /// Populated only after a wrong multiple-choice answer.
        correct_answer: Option<CorrectAnswerText>,
    },
    TellNextQuestion {
        question: String,
        quiz_type: QuizType,
    },
    TellEnd {
        quiz_type: QuizType,
        length: LengthKind,
        score: u32,
        count: u32,
    },
}

impl SysAct {
    /// Answer options for a multiple-choice question; `None` for boolean.
    pub fn answer_options(question: &Question) -> Option<Self> {
        let [(_, a), (_, b), (_, c), (_, d)] = question.answers.options()?;
        Some(Self::TellAnswerOptions {
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
            d: d.to_string(),
        })
    }

    /// Stable act name, as used in the serialized `act` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Bad => "bad",
            Self::Bye => "bye",
            Self::Customize { .. } => "customize",
            Self::TellScore { .. } => "tell_score",
            Self::TellPreviousQuestion { .. } => "tell_previous_question",
            Self::TellAnswerOptions { .. } => "tell_answer_options",
            Self::TellFirstQuestion { .. } => "tell_first_question",
            Self::TellGivenAnswer { .. } => "tell_given_answer",
            Self::TellCorrectAnswer { .. } => "tell_correct_answer",
            Self::TellNextQuestion { .. } => "tell_next_question",
            Self::TellEnd { .. } => "tell_end",
        }
    }
}
