//! Core domain types for the quiz generator.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be constructed and checked in a unit test without a runtime.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`question`] | Option keys, question records, drafts returned by a source |
//! | [`score`] | Scoring reduction, percentage, status tiers |
//! | [`export`] | Plain-text transcript and printable report rendering |
//! | [`ui`] | View enum and display options |

pub mod export;
pub mod question;
pub mod score;
pub mod ui;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use export::{results_report, transcript};
pub use question::{
    Answers, CorrectAnswer, OptionKey, OptionKeyParseError, Options, Question, QuestionDraft,
    QuestionId,
};
pub use score::{Score, StatusTier, score};
pub use ui::{UiOptions, View};

// ============================================================================
// NonEmptyString
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("value must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    /// Trims surrounding whitespace and rejects what is left if it is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(EmptyStringError)
        } else if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subject a quiz is generated about. Always trimmed and non-empty.
pub type Topic = NonEmptyString;

#[cfg(test)]
pub(crate) fn sample_question(n: usize, correct: OptionKey) -> Question {
    Question::from_draft(
        QuestionId::new(format!("q-{n}")),
        QuestionDraft {
            question: format!("Question {n}?"),
            options: Options {
                a: format!("alpha {n}"),
                b: format!("bravo {n}"),
                c: format!("charlie {n}"),
                d: format!("delta {n}"),
            },
            correct_answer: CorrectAnswer::Key(correct),
            explanation: format!("Because {n}."),
        },
    )
}
