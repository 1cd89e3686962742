//! Quiz questions and their answers.
//!
//! Provider-independent pieces of question handling live here so every
//! question source normalizes text and lays out options the same way.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::config::{Category, QuizType};
use crate::domain::foundation::ValidationError;

/// Label of a multiple-choice option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterKey {
    A,
    B,
    C,
    D,
}

impl LetterKey {
    pub const ALL: [LetterKey; 4] = [LetterKey::A, LetterKey::B, LetterKey::C, LetterKey::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
        }
    }
}

impl fmt::Display for LetterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            other => Err(ValidationError::invalid_format(
                "letter_key",
                format!("expected a, b, c or d, got '{}'", other),
            )),
        }
    }
}

/// The answers attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answers {
    Boolean {
        correct: bool,
    },
    /// The correct key and the incorrect keys cover a-d exactly once.
    MultipleChoice {
        correct_key: LetterKey,
        correct_text: String,
        incorrect: BTreeMap<LetterKey, String>,
    },
}

impl Answers {
    /// Returns true if `token` names the correct answer.
    ///
    /// Tokens that do not fit the question shape are never correct.
    pub fn is_correct(&self, token: &str) -> bool {
        match self {
            Self::Boolean { correct } => parse_bool_token(token) == Some(*correct),
            Self::MultipleChoice { correct_key, .. } => {
                token.parse::<LetterKey>().ok() == Some(*correct_key)
            }
        }
    }

    /// All four options in a-d order, for multiple-choice answers.
    pub fn options(&self) -> Option<[(LetterKey, &str); 4]> {
        match self {
            Self::Boolean { .. } => None,
            Self::MultipleChoice {
                correct_key,
                correct_text,
                incorrect,
            } => {
                Some(LetterKey::ALL.map(|key| {
                    let text = if key == *correct_key {
                        correct_text.as_str()
                    } else {
                        incorrect.get(&key).map(String::as_str).unwrap_or_default()
                    };
                    (key, text)
                }))
            }
        }
    }
}

fn parse_bool_token(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// A question ready to be put to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Normalized question text; also the deduplication key.
    pub text: String,
    pub quiz_type: QuizType,
    pub answers: Answers,
}

impl Question {
    /// Builds a boolean question, normalizing the text.
    pub fn boolean(text: &str, correct: bool) -> Self {
        Self {
            text: normalize_question_text(text, QuizType::Boolean),
            quiz_type: QuizType::Boolean,
            answers: Answers::Boolean { correct },
        }
    }

    /// Builds a multiple-choice question with the correct answer on `correct_key`.
    ///
    /// Incorrect answers fill the remaining keys in the order given.
    pub fn multiple_choice(
        text: &str,
        correct_key: LetterKey,
        correct_text: impl Into<String>,
        incorrect: &[String],
    ) -> Result<Self, ValidationError> {
        let remaining: Vec<LetterKey> = LetterKey::ALL
            .into_iter()
            .filter(|key| *key != correct_key)
            .collect();
        if incorrect.len() < remaining.len() {
            return Err(ValidationError::invalid_format(
                "incorrect_answers",
                format!(
                    "expected {} incorrect answers, got {}",
                    remaining.len(),
                    incorrect.len()
                ),
            ));
        }

        let incorrect = remaining
            .into_iter()
            .zip(incorrect.iter().map(|answer| decode_entities(answer)))
            .collect();

        Ok(Self {
            text: normalize_question_text(text, QuizType::MultipleChoice),
            quiz_type: QuizType::MultipleChoice,
            answers: Answers::MultipleChoice {
                correct_key,
                correct_text: decode_entities(&correct_text.into()),
                incorrect,
            },
        })
    }
}

/// Places the correct answer on a uniformly random letter-key.
pub fn assign_letter_keys<R: Rng + ?Sized>(
    rng: &mut R,
    text: &str,
    correct_text: &str,
    incorrect: &[String],
) -> Result<Question, ValidationError> {
    let correct_key = LetterKey::ALL.choose(rng).copied().unwrap_or(LetterKey::A);
    Question::multiple_choice(text, correct_key, correct_text, incorrect)
}

/// Picks one provider category id, or `None` for "any".
pub fn pick_category_id<R: Rng + ?Sized>(rng: &mut R, category: Category) -> Option<u32> {
    category.provider_ids().choose(rng).copied()
}

/// Decodes HTML entities and fixes up terminal punctuation.
pub fn normalize_question_text(raw: &str, quiz_type: QuizType) -> String {
    let text = decode_entities(raw);
    let text = text.trim();
    let terminated = text.ends_with(['?', '.', '!', ':']);

    match (quiz_type, terminated) {
        (_, true) => text.to_string(),
        (QuizType::MultipleChoice, false) => format!("{}?", text),
        (QuizType::Boolean, false) => format!("{}.", text),
    }
}

fn decode_entities(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}
