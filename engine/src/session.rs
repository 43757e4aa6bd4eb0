//! The quiz state machine.
//!
//! ```text
//! landing --generate ok--> quiz --finish--> results
//!    ^                                        |
//!    +----------------- reset ----------------+
//! ```
//!
//! Every transition checks the current view first and leaves the session
//! untouched when it is rejected. `reset` is accepted from anywhere.

use thiserror::Error;

use mcq_providers::GenerationError;
use mcq_types::{
    Answers, OptionKey, Question, QuestionId, Score, StatusTier, Topic, View, score,
};

/// Shown on the landing view for any source failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate questions. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Please enter a topic first.")]
    EmptyTopic,
    #[error("{0}")]
    GenerationFailed(String),
    #[error("Already generating questions")]
    GenerationInProgress,
    #[error("No question generation is pending")]
    NoGenerationPending,
    #[error("Not available in the {actual} view (expected {expected})")]
    WrongView { expected: View, actual: View },
    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    topic: String,
    questions: Vec<Question>,
    answers: Answers,
    is_generating: bool,
    error: Option<String>,
    view: View,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn expect_view(&self, expected: View) -> Result<(), QuizError> {
        if self.view == expected {
            Ok(())
        } else {
            Err(QuizError::WrongView {
                expected,
                actual: self.view,
            })
        }
    }

    pub fn set_topic(&mut self, text: impl Into<String>) -> Result<(), QuizError> {
        self.expect_view(View::Landing)?;
        if self.is_generating {
            return Err(QuizError::GenerationInProgress);
        }
        self.topic = text.into();
        Ok(())
    }

    /// Validate the topic and mark a generation as outstanding.
    ///
    /// Returns the trimmed topic to hand to the source. A blank topic records
    /// the error for display and never marks the session as generating.
    pub fn begin_generation(&mut self) -> Result<Topic, QuizError> {
        self.expect_view(View::Landing)?;
        if self.is_generating {
            return Err(QuizError::GenerationInProgress);
        }

        let Ok(topic) = Topic::new(self.topic.as_str()) else {
            let err = QuizError::EmptyTopic;
            self.error = Some(err.to_string());
            return Err(err);
        };

        self.error = None;
        self.answers.clear();
        self.is_generating = true;
        Ok(topic)
    }

    /// Apply the outcome of the outstanding generation.
    ///
    /// On failure the questions from any previous round are left as they were.
    pub fn complete_generation(
        &mut self,
        outcome: Result<Vec<Question>, GenerationError>,
    ) -> Result<(), QuizError> {
        if !self.is_generating {
            return Err(QuizError::NoGenerationPending);
        }
        self.is_generating = false;

        let failure = match outcome {
            Ok(questions) if !questions.is_empty() => {
                tracing::info!(count = questions.len(), "Questions generated");
                self.questions = questions;
                self.answers.clear();
                self.view = View::Quiz;
                return Ok(());
            }
            Ok(_) => GenerationError::EmptyResponse,
            Err(err) => err,
        };

        tracing::error!(error = %failure, "Error generating questions");
        self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
        Err(QuizError::GenerationFailed(GENERATION_FAILED_MESSAGE.to_string()))
    }

    /// Record (or overwrite) the chosen option for a question.
    pub fn select_option(&mut self, id: &QuestionId, key: OptionKey) -> Result<(), QuizError> {
        self.expect_view(View::Quiz)?;
        if !self.questions.iter().any(|q| q.id() == id) {
            return Err(QuizError::UnknownQuestion(id.clone()));
        }
        self.answers.insert(id.clone(), key);
        Ok(())
    }

    /// Move to the results view. Completeness is the caller's concern.
    pub fn finish(&mut self) -> Result<(), QuizError> {
        self.expect_view(View::Quiz)?;
        self.view = View::Results;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<OptionKey> {
        self.answers.get(id).copied()
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.contains_key(q.id()))
            .count()
    }

    #[must_use]
    pub fn all_answered(&self) -> bool {
        !self.questions.is_empty() && self.answered_count() == self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> Score {
        score(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn percentage(&self) -> Option<u8> {
        self.score().percentage()
    }

    #[must_use]
    pub fn status_tier(&self) -> Option<StatusTier> {
        self.score().status_tier()
    }
}
