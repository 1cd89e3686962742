//! Quiz dialog phases.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a session is in the quiz dialog.
///
/// `Welcome` → `Setup` → `Playing` → `Terminal`, with `Bye` able to end the
/// dialog from any live phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    /// Nothing has been said yet.
    #[default]
    Welcome,
    /// Collecting the four configuration slots.
    Setup,
    /// Asking and evaluating questions.
    Playing,
    /// The game is over.
    Terminal,
}

impl QuizPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Setup => "Setup",
            Self::Playing => "Playing",
            Self::Terminal => "Terminal",
        }
    }

    /// Returns true while the session still accepts turns that can change state.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Terminal)
    }
}

impl StateMachine for QuizPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use QuizPhase::*;
        matches!(
            (self, target),
            (Welcome, Setup)
                | (Welcome, Playing)
                | (Welcome, Terminal)
                | (Setup, Setup)
                | (Setup, Playing)
                | (Setup, Terminal)
                | (Playing, Playing)
                | (Playing, Terminal)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use QuizPhase::*;
        match self {
            Welcome => vec![Setup, Playing, Terminal],
            Setup => vec![Setup, Playing, Terminal],
            Playing => vec![Playing, Terminal],
            Terminal => vec![],
        }
    }
}
