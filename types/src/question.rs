//! Question records and the option keys that label their choices.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four fixed answer labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an option key: {0:?}")]
pub struct OptionKeyParseError(pub String);

impl OptionKey {
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Accepts `a`..`d` in either case, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, OptionKeyParseError> {
        match raw.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            "D" | "d" => Ok(Self::D),
            _ => Err(OptionKeyParseError(raw.to_owned())),
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four option texts of a question. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl Options {
    #[must_use]
    pub fn get(&self, key: OptionKey) -> &str {
        match key {
            OptionKey::A => &self.a,
            OptionKey::B => &self.b,
            OptionKey::C => &self.c,
            OptionKey::D => &self.d,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &str)> {
        OptionKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

/// The correct answer as reported by the source.
///
/// Sources are not trusted to stay inside A-D. An unrecognized value is kept
/// verbatim so it can be displayed, and no selection ever matches it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CorrectAnswer {
    Key(OptionKey),
    Unrecognized(String),
}

impl CorrectAnswer {
    #[must_use]
    pub fn key(&self) -> Option<OptionKey> {
        match self {
            Self::Key(key) => Some(*key),
            Self::Unrecognized(_) => None,
        }
    }

    #[must_use]
    pub fn matches(&self, selected: OptionKey) -> bool {
        self.key() == Some(selected)
    }
}

impl From<String> for CorrectAnswer {
    fn from(raw: String) -> Self {
        match OptionKey::parse(&raw) {
            Ok(key) => Self::Key(key),
            Err(_) => Self::Unrecognized(raw),
        }
    }
}

impl From<OptionKey> for CorrectAnswer {
    fn from(key: OptionKey) -> Self {
        Self::Key(key)
    }
}

impl fmt::Display for CorrectAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => key.fmt(f),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Identifier assigned to a question when it enters a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId(String);

impl QuestionId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A question as the source returns it, before an id is assigned.
///
/// Field names follow the JSON shape requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub options: Options,
    pub correct_answer: CorrectAnswer,
    pub explanation: String,
}

/// A question inside a session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Options,
    correct_answer: CorrectAnswer,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn from_draft(id: QuestionId, draft: QuestionDraft) -> Self {
        Self {
            id,
            prompt: draft.question,
            options: draft.options,
            correct_answer: draft.correct_answer,
            explanation: draft.explanation,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &CorrectAnswer {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, selected: Option<OptionKey>) -> bool {
        selected.is_some_and(|key| self.correct_answer.matches(key))
    }
}

/// Chosen option per question id. Partial until every question is answered.
pub type Answers = HashMap<QuestionId, OptionKey>;
