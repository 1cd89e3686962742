//! Game configuration slots.
//!
//! A quiz is configured along four slots (level, quiztype, category, length).
//! The setup phase fills them one at a time; [`GameConfig::complete`] is the
//! gate the policy checks before it asks for any question.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A named configuration dimension of the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Level,
    QuizType,
    Category,
    Length,
}

impl Slot {
    /// Order in which missing slots are asked for during setup.
    pub const SETUP_ORDER: [Slot; 4] = [Slot::Level, Slot::QuizType, Slot::Category, Slot::Length];

    /// Returns the slot name used in belief-state informs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::QuizType => "quiztype",
            Self::Category => "category",
            Self::Length => "length",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "level" | "difficulty_level" | "difficulty" => Ok(Self::Level),
            "quiztype" | "quiz_type" => Ok(Self::QuizType),
            "category" => Ok(Self::Category),
            "length" => Ok(Self::Length),
            other => Err(ValidationError::invalid_format(
                "slot",
                format!("unknown slot '{}'", other),
            )),
        }
    }
}

/// Difficulty filter for questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// No difficulty filter.
    Any,
}

impl Difficulty {
    /// Returns the provider query value, or `None` when no filter applies.
    pub fn provider_value(&self) -> Option<&'static str> {
        match self {
            Self::Easy => Some("easy"),
            Self::Medium => Some("medium"),
            Self::Hard => Some("hard"),
            Self::Any => None,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "any" | "anylevel" => Ok(Self::Any),
            other => Err(ValidationError::invalid_format(
                "level",
                format!("unknown difficulty '{}'", other),
            )),
        }
    }
}

/// Shape of the questions in a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    /// True/false questions.
    Boolean,
    /// Four options labelled a-d.
    MultipleChoice,
}

impl QuizType {
    /// Returns the provider's `type` parameter.
    pub fn provider_value(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::MultipleChoice => "multiple",
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice)
    }
}

impl FromStr for QuizType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "boolean" | "bool" | "truefalse" => Ok(Self::Boolean),
            "multiple" | "multiplechoice" => Ok(Self::MultipleChoice),
            other => Err(ValidationError::invalid_format(
                "quiztype",
                format!("unknown quiz type '{}'", other),
            )),
        }
    }
}

/// Logical question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Entertainment,
    Science,
    Society,
    /// No category filter.
    Any,
}

impl Category {
    /// Returns the provider category identifiers this category covers.
    ///
    /// An empty slice means no filter is applied.
    pub fn provider_ids(&self) -> &'static [u32] {
        match self {
            Self::General => &[9],
            Self::Entertainment => &[10, 11, 12, 13, 14, 15, 16, 26, 29, 31, 32],
            Self::Science => &[17, 18, 19, 27, 30],
            Self::Society => &[20, 21, 22, 23, 24, 25, 28],
            Self::Any => &[],
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "general" => Ok(Self::General),
            "entertainment" => Ok(Self::Entertainment),
            "science" => Ok(Self::Science),
            "society" => Ok(Self::Society),
            "any" | "anycategory" => Ok(Self::Any),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// How many questions a quiz runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizLength {
    /// A fixed number of questions.
    Fixed(NonZeroU32),
    /// Runs until the first wrong answer.
    Unbounded,
}

impl QuizLength {
    pub fn kind(&self) -> LengthKind {
        match self {
            Self::Fixed(_) => LengthKind::Number,
            Self::Unbounded => LengthKind::Infinity,
        }
    }
}

impl FromStr for QuizLength {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "infinity" | "infinite" | "unbounded" | "endless" => Ok(Self::Unbounded),
            digits => digits
                .parse::<u32>()
                .ok()
                .and_then(NonZeroU32::new)
                .map(Self::Fixed)
                .ok_or_else(|| {
                    ValidationError::invalid_format(
                        "length",
                        format!("expected a positive number or 'infinity', got '{}'", digits),
                    )
                }),
        }
    }
}

/// Coarse length classification handed to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthKind {
    Number,
    Infinity,
}

/// The game configuration as it is being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: Option<Difficulty>,
    pub quiz_type: Option<QuizType>,
    pub category: Option<Category>,
    pub length: Option<QuizLength>,
}

impl GameConfig {
    /// Configuration applied when the user declines to customize.
    pub fn defaults() -> Self {
        Self {
            difficulty: Some(Difficulty::Easy),
            quiz_type: Some(QuizType::Boolean),
            category: Some(Category::General),
            length: Some(QuizLength::Unbounded),
        }
    }

    /// Returns true if the slot has a value.
    pub fn is_set(&self, slot: Slot) -> bool {
        match slot {
            Slot::Level => self.difficulty.is_some(),
            Slot::QuizType => self.quiz_type.is_some(),
            Slot::Category => self.category.is_some(),
            Slot::Length => self.length.is_some(),
        }
    }

    /// Returns the first unset slot in setup order.
    pub fn first_missing(&self) -> Option<Slot> {
        Slot::SETUP_ORDER.into_iter().find(|slot| !self.is_set(*slot))
    }

    /// Parses `value` and stores it in `slot`, overwriting any earlier value.
    pub fn apply(&mut self, slot: Slot, value: &str) -> Result<(), ValidationError> {
        match slot {
            Slot::Level => self.difficulty = Some(value.parse()?),
            Slot::QuizType => self.quiz_type = Some(value.parse()?),
            Slot::Category => self.category = Some(value.parse()?),
            Slot::Length => self.length = Some(value.parse()?),
        }
        Ok(())
    }

    /// Returns the configuration with all slots present, if it is complete.
    pub fn complete(&self) -> Option<CompleteConfig> {
        Some(CompleteConfig {
            difficulty: self.difficulty?,
            quiz_type: self.quiz_type?,
            category: self.category?,
            length: self.length?,
        })
    }
}

/// A fully populated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteConfig {
    pub difficulty: Difficulty,
    pub quiz_type: QuizType,
    pub category: Category,
    pub length: QuizLength,
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' ' | '/'))
        .flat_map(char::to_lowercase)
        .collect()
}
