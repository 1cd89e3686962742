//! Quiz dialog policy.
//!
//! Decides, turn by turn, which system acts to emit and how the game state
//! moves. Pure domain logic apart from the one question fetch per advancing
//! turn, which goes through the [`QuestionSource`] port.
//!
//! A turn is atomic: the fetch happens before any counter is touched, so a
//! failed fetch leaves the policy exactly as it was.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::{debug, info, warn};

use super::belief_state::{BeliefState, TurnRequest, UserActType};
use super::config::{CompleteConfig, GameConfig, QuizLength, Slot};
use super::errors::QuizError;
use super::phase::QuizPhase;
use super::question::{Answers, Question};
use super::round::RoundState;
use super::sys_act::{CorrectAnswerText, GivenAnswer, SysAct};
use crate::domain::foundation::StateMachine;
use crate::ports::{QuestionQuery, QuestionSource};

/// Authoritative game state for one session plus the turn logic driving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPolicy {
    config: GameConfig,
    round: RoundState,
    phase: QuizPhase,
    first_turn: bool,
}

impl Default for QuizPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizPolicy {
    /// A fresh session that opens with a welcome.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            round: RoundState::new(),
            phase: QuizPhase::Welcome,
            first_turn: true,
        }
    }

    /// A session whose configuration was settled by the host.
    ///
    /// Skips the welcome; missing slots are still asked for.
    pub fn preconfigured(config: GameConfig) -> Self {
        Self {
            config,
            round: RoundState::new(),
            phase: QuizPhase::Setup,
            first_turn: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_first_turn(&self) -> bool {
        self.first_turn
    }

    /// Processes one user turn and returns the acts to utter, in order.
    pub async fn next_acts(
        &mut self,
        belief: &BeliefState,
        source: &dyn QuestionSource,
    ) -> Result<Vec<SysAct>, QuizError> {
        let first_turn = std::mem::replace(&mut self.first_turn, false);
        if first_turn && belief.is_silent() {
            self.transition(QuizPhase::Setup);
            return Ok(vec![SysAct::Welcome]);
        }
        if self.phase == QuizPhase::Welcome {
            self.transition(QuizPhase::Setup);
        }

        if belief.has_act(UserActType::Bad) {
            return Ok(vec![SysAct::Bad]);
        }
        if belief.has_act(UserActType::Bye) || !self.phase.is_live() {
            if self.phase.is_live() {
                self.transition(QuizPhase::Terminal);
            }
            return Ok(vec![SysAct::Bye]);
        }

        if self.phase == QuizPhase::Setup {
            if belief.has_act(UserActType::Deny) {
                debug!("customization declined, applying default configuration");
                self.config = GameConfig::defaults();
            } else {
                self.absorb_informs(belief);
                if let Some(slot) = self.config.first_missing() {
                    debug!(%slot, "asking for configuration slot");
                    return Ok(vec![SysAct::Customize { slot }]);
                }
            }
            self.transition(QuizPhase::Playing);
        } else if !belief.informs.is_empty() {
            debug!("ignoring configuration informs during play");
        }

        let config = self.config.complete().ok_or_else(|| {
            debug_assert!(false, "configuration incomplete in playing phase");
            QuizError::ConfigurationIncomplete
        })?;

        match belief.request() {
            TurnRequest::Score => Ok(self.tell_score(&config)),
            TurnRequest::Answer(token) if self.round.has_pending_question() => {
                self.evaluate_answer(&config, &token, source).await
            }
            TurnRequest::Empty if self.round.has_pending_question() => Ok(self.repeat_question(&config)),
            TurnRequest::Empty | TurnRequest::Answer(_) => self.first_question(&config, source).await,
        }
    }

    /// Applies setup informs. When several names alias one slot, the
    /// canonical name is applied last and wins.
    fn absorb_informs(&mut self, belief: &BeliefState) {
        let mut informs = Vec::with_capacity(belief.informs.len());
        for (name, value) in &belief.informs {
            match name.parse::<Slot>() {
                Ok(slot) => informs.push((slot, name.as_str(), value.as_str())),
                Err(err) => warn!(slot = %name, error = %err, "ignoring inform for unknown slot"),
            }
        }
        informs.sort_by_key(|&(slot, name, _)| (name == slot.as_str(), name));

        for (slot, _, value) in informs {
            if let Err(err) = self.config.apply(slot, value) {
                warn!(%slot, %value, error = %err, "ignoring unparsable slot value");
            }
        }
    }

    fn tell_score(&self, config: &CompleteConfig) -> Vec<SysAct> {
        let mut acts = vec![SysAct::TellScore {
            count: (self.round.count > 0).then_some(self.round.count),
            score: self.round.score,
            length: config.length.kind(),
        }];
        acts.extend(self.repeat_question(config));
        acts
    }

    fn repeat_question(&self, config: &CompleteConfig) -> Vec<SysAct> {
        let mut acts = vec![SysAct::TellPreviousQuestion {
            quiz_type: config.quiz_type,
            question: self.round.current_text().map(str::to_string),
        }];
        if let Some(options) = self.round.current_question.as_ref().and_then(SysAct::answer_options) {
            acts.push(options);
        }
        acts
    }

    async fn first_question(
        &mut self,
        config: &CompleteConfig,
        source: &dyn QuestionSource,
    ) -> Result<Vec<SysAct>, QuizError> {
        let question = self.fetch(config, source).await?;
        self.round.record_question();

        let mut acts = vec![SysAct::TellFirstQuestion {
            question: question.text.clone(),
            quiz_type: config.quiz_type,
        }];
        acts.extend(SysAct::answer_options(&question));
        self.round.serve(question);
        Ok(acts)
    }

    async fn evaluate_answer(
        &mut self,
        config: &CompleteConfig,
        token: &str,
        source: &dyn QuestionSource,
    ) -> Result<Vec<SysAct>, QuizError> {
        let previous = self
            .round
            .current_question
            .as_ref()
            .map(|q| q.answers.clone())
            .ok_or_else(|| QuizError::MalformedInput("answer given with no pending question".into()))?;
        let is_correct = previous.is_correct(token);
        let count = self.round.count + 1;
        debug!(token, is_correct, count, "evaluated answer");

        match config.length {
            QuizLength::Unbounded if !is_correct => {
                self.round.record_question();
                Ok(vec![self.end(config)])
            }
            QuizLength::Unbounded => {
                let question = self.fetch(config, source).await?;
                self.round.record_question();
                self.round.record_correct();
                Ok(self.next_question(config, question, Vec::new()))
            }
            QuizLength::Fixed(limit) => {
                let continues = count <= limit.get();
                let next = if continues {
                    Some(self.fetch(config, source).await?)
                } else {
                    None
                };

                self.round.record_question();
                if is_correct {
                    self.round.record_correct();
                }

                let mut acts = vec![SysAct::TellGivenAnswer {
                    given_answer: GivenAnswer::from_correct(is_correct),
                }];
                if config.quiz_type.is_multiple_choice() {
                    acts.push(SysAct::TellCorrectAnswer {
                        correct_answer: correct_answer_text(&previous, is_correct),
                    });
                }

                match next {
                    Some(question) => Ok(self.next_question(config, question, acts)),
                    None => {
                        acts.push(self.end(config));
                        Ok(acts)
                    }
                }
            }
        }
    }

    fn next_question(
        &mut self,
        config: &CompleteConfig,
        question: Question,
        mut acts: Vec<SysAct>,
    ) -> Vec<SysAct> {
        acts.push(SysAct::TellNextQuestion {
            question: question.text.clone(),
            quiz_type: config.quiz_type,
        });
        acts.extend(SysAct::answer_options(&question));
        self.round.serve(question);
        acts
    }

    fn end(&mut self, config: &CompleteConfig) -> SysAct {
        self.transition(QuizPhase::Terminal);
        info!(
            score = self.round.score,
            count = self.round.count,
            length = ?config.length,
            "quiz finished"
        );
        SysAct::TellEnd {
            quiz_type: config.quiz_type,
            length: config.length.kind(),
            score: self.round.score,
            count: self.round.count,
        }
    }

    async fn fetch(
        &self,
        config: &CompleteConfig,
        source: &dyn QuestionSource,
    ) -> Result<Question, QuizError> {
        let query = QuestionQuery::from(config);
        let question = source
            .fetch_question(&query, &self.round.asked_questions)
            .await?;
        Ok(question)
    }

    fn transition(&mut self, target: QuizPhase) {
        match self.phase.transition_to(target) {
            Ok(phase) => {
                if phase != self.phase {
                    debug!(from = self.phase.label(), to = phase.label(), "quiz phase changed");
                }
                self.phase = phase;
            }
            Err(err) => warn!(error = %err, "rejected quiz phase transition"),
        }
    }
}

fn correct_answer_text(answers: &Answers, is_correct: bool) -> Option<CorrectAnswerText> {
    match answers {
        Answers::MultipleChoice {
            correct_key,
            correct_text,
            ..
        } if !is_correct => Some(CorrectAnswerText {
            key: *correct_key,
            text: correct_text.clone(),
        }),
        _ => None,
    }
}

/// Fixed quiz length helper for hosts building configs in code.
pub fn fixed_length(questions: u32) -> Option<QuizLength> {
    NonZeroU32::new(questions).map(QuizLength::Fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockQuestionSource;
    use crate::domain::quiz::{Category, Difficulty, LengthKind, LetterKey, QuizType};
    use crate::ports::QuestionSourceError;

    fn config(quiz_type: QuizType, length: QuizLength) -> GameConfig {
        GameConfig {
            difficulty: Some(Difficulty::Easy),
            quiz_type: Some(quiz_type),
            category: Some(Category::General),
            length: Some(length),
        }
    }

    fn boolean_pool(size: usize) -> MockQuestionSource {
        MockQuestionSource::new()
            .with_questions((0..size).map(|i| Question::boolean(&format!("Statement {}", i), true)))
    }

    fn mc_question(text: &str, key: LetterKey) -> Question {
        Question::multiple_choice(
            text,
            key,
            "right",
            &["w1".to_string(), "w2".to_string(), "w3".to_string()],
        )
        .unwrap()
    }

    mod welcome_and_setup {
        use super::*;

        #[tokio::test]
        async fn silent_first_turn_welcomes() {
            let mut policy = QuizPolicy::new();
            let source = MockQuestionSource::new();

            let acts = policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Welcome]);
            assert_eq!(policy.phase(), QuizPhase::Setup);
            assert!(!policy.is_first_turn());
        }

        #[tokio::test]
        async fn second_silent_turn_asks_for_level() {
            let mut policy = QuizPolicy::new();
            let source = MockQuestionSource::new();
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            let acts = policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Customize { slot: Slot::Level }]);
        }

        #[tokio::test]
        async fn first_turn_with_acts_skips_welcome() {
            let mut policy = QuizPolicy::new();
            let source = MockQuestionSource::new();

            let belief = BeliefState::new().with_act(UserActType::Confirm);
            let acts = policy.next_acts(&belief, &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Customize { slot: Slot::Level }]);
            assert!(!policy.is_first_turn());
        }

        #[tokio::test]
        async fn slots_are_asked_in_fixed_order() {
            let mut policy = QuizPolicy::preconfigured(GameConfig::default());
            let source = boolean_pool(3);

            let acts = policy
                .next_acts(&BeliefState::new().with_inform("category", "science"), &source)
                .await
                .unwrap();
            assert_eq!(acts, vec![SysAct::Customize { slot: Slot::Level }]);

            let acts = policy
                .next_acts(&BeliefState::new().with_inform("length", "3"), &source)
                .await
                .unwrap();
            assert_eq!(acts, vec![SysAct::Customize { slot: Slot::Level }]);

            let acts = policy
                .next_acts(&BeliefState::new().with_inform("level", "hard"), &source)
                .await
                .unwrap();
            assert_eq!(acts, vec![SysAct::Customize { slot: Slot::QuizType }]);
            assert_eq!(source.call_count(), 0);
        }

        #[tokio::test]
        async fn completing_setup_asks_first_question_in_same_turn() {
            let mut policy = QuizPolicy::preconfigured(GameConfig::default());
            let source = boolean_pool(3);

            let belief = BeliefState::new()
                .with_inform("level", "easy")
                .with_inform("quiztype", "boolean")
                .with_inform("category", "general")
                .with_inform("length", "2");
            let acts = policy.next_acts(&belief, &source).await.unwrap();

            assert!(matches!(acts.as_slice(), [SysAct::TellFirstQuestion { .. }]));
            assert_eq!(policy.phase(), QuizPhase::Playing);
            assert_eq!(policy.round().count, 1);
        }

        #[tokio::test]
        async fn unparsable_value_is_asked_again() {
            let mut policy = QuizPolicy::preconfigured(GameConfig::default());
            let source = MockQuestionSource::new();

            let acts = policy
                .next_acts(&BeliefState::new().with_inform("level", "impossible"), &source)
                .await
                .unwrap();

            assert_eq!(acts, vec![SysAct::Customize { slot: Slot::Level }]);
            assert_eq!(policy.config().difficulty, None);
        }

        #[tokio::test]
        async fn deny_applies_defaults_over_partial_informs() {
            let mut policy = QuizPolicy::preconfigured(GameConfig::default());
            let source = boolean_pool(2);
            policy
                .next_acts(
                    &BeliefState::new()
                        .with_inform("level", "hard")
                        .with_inform("length", "5"),
                    &source,
                )
                .await
                .unwrap();

            let acts = policy
                .next_acts(&BeliefState::new().with_act(UserActType::Deny), &source)
                .await
                .unwrap();

            assert_eq!(policy.config(), &GameConfig::defaults());
            assert!(matches!(
                acts.as_slice(),
                [SysAct::TellFirstQuestion {
                    quiz_type: QuizType::Boolean,
                    ..
                }]
            ));
        }
    }

    mod short_circuits {
        use super::*;

        #[tokio::test]
        async fn bad_never_advances() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(3);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            let before = policy.clone();

            let belief = BeliefState::answer("true").with_act(UserActType::Bad);
            let acts = policy.next_acts(&belief, &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Bad]);
            assert_eq!(policy, before);
            assert_eq!(source.call_count(), 1);
        }

        #[tokio::test]
        async fn bye_ends_setup() {
            let mut policy = QuizPolicy::preconfigured(GameConfig::default());
            let source = MockQuestionSource::new();

            let belief = BeliefState::new()
                .with_act(UserActType::Bye)
                .with_inform("level", "easy");
            let acts = policy.next_acts(&belief, &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Bye]);
            assert_eq!(policy.phase(), QuizPhase::Terminal);
            assert_eq!(policy.config().difficulty, None);
        }

        #[tokio::test]
        async fn bad_takes_precedence_over_bye() {
            let mut policy = QuizPolicy::preconfigured(GameConfig::default());
            let source = MockQuestionSource::new();

            let belief = BeliefState::new()
                .with_act(UserActType::Bye)
                .with_act(UserActType::Bad);
            let acts = policy.next_acts(&belief, &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Bad]);
            assert_eq!(policy.phase(), QuizPhase::Setup);
        }

        #[tokio::test]
        async fn terminal_sessions_only_say_bye() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(3);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            policy.next_acts(&BeliefState::answer("false"), &source).await.unwrap();
            assert_eq!(policy.phase(), QuizPhase::Terminal);

            let acts = policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();

            assert_eq!(acts, vec![SysAct::Bye]);
            assert_eq!(source.call_count(), 1);
        }
    }

    mod score_requests {
        use super::*;

        #[tokio::test]
        async fn score_does_not_advance() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, fixed_length(3).unwrap()));
            let source = boolean_pool(5);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();
            let before = policy.clone();

            for _ in 0..3 {
                let acts = policy.next_acts(&BeliefState::answer("score"), &source).await.unwrap();
                assert_eq!(
                    acts,
                    vec![
                        SysAct::TellScore {
                            count: Some(2),
                            score: 1,
                            length: LengthKind::Number,
                        },
                        SysAct::TellPreviousQuestion {
                            quiz_type: QuizType::Boolean,
                            question: Some("Statement 1.".to_string()),
                        },
                    ]
                );
            }

            assert_eq!(policy, before);
            assert_eq!(source.call_count(), 2);
        }

        #[tokio::test]
        async fn multiple_choice_score_repeats_options() {
            let mut policy =
                QuizPolicy::preconfigured(config(QuizType::MultipleChoice, QuizLength::Unbounded));
            let source = MockQuestionSource::new().with_question(mc_question("Pick one", LetterKey::A));
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            let acts = policy.next_acts(&BeliefState::answer("score"), &source).await.unwrap();

            assert_eq!(acts.len(), 3);
            assert_eq!(
                acts[0],
                SysAct::TellScore {
                    count: Some(1),
                    score: 0,
                    length: LengthKind::Infinity,
                }
            );
            assert!(matches!(acts[2], SysAct::TellAnswerOptions { ref a, .. } if a == "right"));
        }

        #[tokio::test]
        async fn score_before_any_question_reports_no_count() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(1);

            let acts = policy.next_acts(&BeliefState::answer("score"), &source).await.unwrap();

            assert_eq!(
                acts,
                vec![
                    SysAct::TellScore {
                        count: None,
                        score: 0,
                        length: LengthKind::Infinity,
                    },
                    SysAct::TellPreviousQuestion {
                        quiz_type: QuizType::Boolean,
                        question: None,
                    },
                ]
            );
            assert_eq!(source.call_count(), 0);
        }
    }

    mod fixed_length_games {
        use super::*;

        #[tokio::test]
        async fn two_question_boolean_game() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, fixed_length(2).unwrap()));
            let source = MockQuestionSource::new()
                .with_question(Question::boolean("First", true))
                .with_question(Question::boolean("Second", false))
                .with_question(Question::boolean("Third", true));

            let acts = policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            assert_eq!(
                acts,
                vec![SysAct::TellFirstQuestion {
                    question: "First.".to_string(),
                    quiz_type: QuizType::Boolean,
                }]
            );
            assert_eq!(policy.round().count, 1);

            let acts = policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();
            assert_eq!(
                acts,
                vec![
                    SysAct::TellGivenAnswer {
                        given_answer: GivenAnswer::Correct,
                    },
                    SysAct::TellNextQuestion {
                        question: "Second.".to_string(),
                        quiz_type: QuizType::Boolean,
                    },
                ]
            );
            assert_eq!((policy.round().count, policy.round().score), (2, 1));

            let acts = policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();
            assert_eq!(
                acts,
                vec![
                    SysAct::TellGivenAnswer {
                        given_answer: GivenAnswer::Incorrect,
                    },
                    SysAct::TellEnd {
                        quiz_type: QuizType::Boolean,
                        length: LengthKind::Number,
                        score: 1,
                        count: 3,
                    },
                ]
            );
            assert_eq!(policy.phase(), QuizPhase::Terminal);
            assert_eq!(source.call_count(), 2);
        }

        #[tokio::test]
        async fn last_answer_counts_towards_score() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, fixed_length(1).unwrap()));
            let source = boolean_pool(2);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            let acts = policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();

            assert_eq!(
                acts.last(),
                Some(&SysAct::TellEnd {
                    quiz_type: QuizType::Boolean,
                    length: LengthKind::Number,
                    score: 1,
                    count: 2,
                })
            );
        }

        #[tokio::test]
        async fn wrong_multiple_choice_answer_names_correct_option() {
            let mut policy =
                QuizPolicy::preconfigured(config(QuizType::MultipleChoice, fixed_length(3).unwrap()));
            let source = MockQuestionSource::new()
                .with_question(mc_question("Which", LetterKey::C))
                .with_question(mc_question("What", LetterKey::A));
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            let acts = policy.next_acts(&BeliefState::answer("a"), &source).await.unwrap();

            assert_eq!(
                acts[0],
                SysAct::TellGivenAnswer {
                    given_answer: GivenAnswer::Incorrect,
                }
            );
            assert_eq!(
                acts[1],
                SysAct::TellCorrectAnswer {
                    correct_answer: Some(CorrectAnswerText {
                        key: LetterKey::C,
                        text: "right".to_string(),
                    }),
                }
            );
            assert!(matches!(acts[2], SysAct::TellNextQuestion { ref question, .. } if question == "What?"));
            assert!(matches!(acts[3], SysAct::TellAnswerOptions { .. }));
            assert_eq!(policy.round().score, 0);
        }

        #[tokio::test]
        async fn right_multiple_choice_answer_carries_none_sentinel() {
            let mut policy =
                QuizPolicy::preconfigured(config(QuizType::MultipleChoice, fixed_length(3).unwrap()));
            let source = MockQuestionSource::new()
                .with_question(mc_question("Which", LetterKey::C))
                .with_question(mc_question("What", LetterKey::A));
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            let acts = policy.next_acts(&BeliefState::answer("C"), &source).await.unwrap();

            assert_eq!(
                acts[1],
                SysAct::TellCorrectAnswer {
                    correct_answer: None,
                }
            );
            assert_eq!(policy.round().score, 1);
        }
    }

    mod unbounded_games {
        use super::*;

        #[tokio::test]
        async fn correct_answers_keep_the_game_going() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(4);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            for _ in 0..3 {
                let acts = policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();
                assert!(matches!(acts.as_slice(), [SysAct::TellNextQuestion { .. }]));
            }
            assert_eq!((policy.round().count, policy.round().score), (4, 3));
        }

        #[tokio::test]
        async fn first_wrong_answer_ends_without_fetching() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(4);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();

            let acts = policy.next_acts(&BeliefState::answer("false"), &source).await.unwrap();

            assert_eq!(
                acts,
                vec![SysAct::TellEnd {
                    quiz_type: QuizType::Boolean,
                    length: LengthKind::Infinity,
                    score: 1,
                    count: 3,
                }]
            );
            assert_eq!(policy.phase(), QuizPhase::Terminal);
            assert_eq!(source.call_count(), 2);
        }
    }

    mod degraded_input {
        use super::*;

        #[tokio::test]
        async fn canonical_slot_name_wins_over_alias() {
            let belief = BeliefState::new()
                .with_inform("difficulty_level", "easy")
                .with_inform("level", "hard")
                .with_inform("difficulty", "medium");

            for _ in 0..20 {
                let mut policy = QuizPolicy::preconfigured(GameConfig::default());
                policy.next_acts(&belief, &MockQuestionSource::new()).await.unwrap();
                assert_eq!(policy.config().difficulty, Some(Difficulty::Hard));
            }
        }

        #[tokio::test]
        async fn empty_turn_mid_game_repeats_question() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(3);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            let before = policy.clone();

            let acts = policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            assert_eq!(
                acts,
                vec![SysAct::TellPreviousQuestion {
                    quiz_type: QuizType::Boolean,
                    question: Some("Statement 0.".to_string()),
                }]
            );
            assert_eq!(policy, before);
        }

        #[tokio::test]
        async fn informs_during_play_are_ignored() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(3);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();

            policy
                .next_acts(&BeliefState::answer("true").with_inform("quiztype", "multiple"), &source)
                .await
                .unwrap();

            assert_eq!(policy.config().quiz_type, Some(QuizType::Boolean));
        }

        #[tokio::test]
        async fn source_failure_leaves_state_untouched() {
            let mut policy = QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
            let source = boolean_pool(3);
            policy.next_acts(&BeliefState::new(), &source).await.unwrap();
            let before = policy.clone();

            let source = source.with_error(QuestionSourceError::network("connection reset"));
            let err = policy
                .next_acts(&BeliefState::answer("true"), &source)
                .await
                .unwrap_err();

            assert!(matches!(err, QuizError::SourceUnavailable(_)));
            assert_eq!(policy, before);
        }
    }

    #[test]
    fn fixed_length_rejects_zero() {
        assert!(fixed_length(0).is_none());
        assert_eq!(fixed_length(2), Some(QuizLength::Fixed(NonZeroU32::new(2).unwrap())));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        fn arb_slot() -> impl Strategy<Value = Slot> {
            prop::sample::select(Slot::SETUP_ORDER.to_vec())
        }

        fn value_for(slot: Slot) -> &'static str {
            match slot {
                Slot::Level => "medium",
                Slot::QuizType => "boolean",
                Slot::Category => "science",
                Slot::Length => "2",
            }
        }

        fn run<F: std::future::Future>(future: F) -> F::Output {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(future)
        }

        proptest! {
            #[test]
            fn setup_asks_missing_slots_in_fixed_order(
                turns in prop::collection::vec(prop::collection::vec(arb_slot(), 0..3), 1..8)
            ) {
                run(async {
                    let mut policy = QuizPolicy::preconfigured(GameConfig::default());
                    let source = boolean_pool(3);
                    let mut supplied = HashSet::new();

                    for turn in &turns {
                        let mut belief = BeliefState::new();
                        for slot in turn {
                            belief = belief.with_inform(slot.as_str(), value_for(*slot));
                            supplied.insert(*slot);
                        }
                        let acts = policy.next_acts(&belief, &source).await.unwrap();

                        match Slot::SETUP_ORDER.iter().find(|slot| !supplied.contains(*slot)) {
                            Some(missing) => {
                                assert_eq!(acts, vec![SysAct::Customize { slot: *missing }])
                            }
                            None => {
                                assert!(matches!(acts.first(), Some(SysAct::TellFirstQuestion { .. })));
                                break;
                            }
                        }
                    }
                });
            }

            #[test]
            fn deny_always_yields_defaults(partial in prop::collection::vec(arb_slot(), 0..3)) {
                run(async {
                    let mut policy = QuizPolicy::preconfigured(GameConfig::default());
                    let source = boolean_pool(1);
                    let mut belief = BeliefState::new();
                    for slot in &partial {
                        let value = match slot {
                            Slot::Level => "hard",
                            Slot::QuizType => "multiple",
                            Slot::Category => "society",
                            Slot::Length => "7",
                        };
                        belief = belief.with_inform(slot.as_str(), value);
                    }
                    if !belief.informs.is_empty() {
                        policy.next_acts(&belief, &source).await.unwrap();
                    }

                    policy
                        .next_acts(&BeliefState::new().with_act(UserActType::Deny), &source)
                        .await
                        .unwrap();

                    assert_eq!(policy.config(), &GameConfig::defaults());
                });
            }

            #[test]
            fn score_requests_never_advance(correct in 0usize..4, requests in 1usize..5) {
                run(async {
                    let mut policy =
                        QuizPolicy::preconfigured(config(QuizType::Boolean, QuizLength::Unbounded));
                    let source = boolean_pool(8);
                    policy.next_acts(&BeliefState::new(), &source).await.unwrap();
                    for _ in 0..correct {
                        policy.next_acts(&BeliefState::answer("true"), &source).await.unwrap();
                    }
                    let before = policy.clone();
                    let fetches = source.call_count();

                    for _ in 0..requests {
                        policy.next_acts(&BeliefState::answer("score"), &source).await.unwrap();
                    }

                    assert_eq!(policy, before);
                    assert_eq!(source.call_count(), fetches);
                });
            }

            #[test]
            fn fixed_length_fetches_exactly_n(answers in prop::collection::vec(any::<bool>(), 1..6)) {
                run(async {
                    let n = answers.len() as u32;
                    let mut policy =
                        QuizPolicy::preconfigured(config(QuizType::Boolean, fixed_length(n).unwrap()));
                    let source = boolean_pool(answers.len() + 1);
                    policy.next_acts(&BeliefState::new(), &source).await.unwrap();

                    let mut last = Vec::new();
                    for right in &answers {
                        let token = if *right { "true" } else { "false" };
                        last = policy.next_acts(&BeliefState::answer(token), &source).await.unwrap();
                    }

                    let correct = answers.iter().filter(|right| **right).count() as u32;
                    assert_eq!(source.call_count(), answers.len());
                    assert_eq!(policy.phase(), QuizPhase::Terminal);
                    assert_eq!(
                        last.last(),
                        Some(&SysAct::TellEnd {
                            quiz_type: QuizType::Boolean,
                            length: LengthKind::Number,
                            score: correct,
                            count: n + 1,
                        })
                    );
                });
            }
        }
    }
}
