use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::scan;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("expected answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── POINTS ────────────────────────────────────────────────────────────────────
//

/// Points awarded for answering a question, always within `[MIN, MAX]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Points(u32);

impl Points {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;
    pub const DEFAULT: u32 = 10;

    /// Clamps a raw value into range.
    ///
    /// Zero is treated as "no value" and maps to the default rather than the
    /// minimum.
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        if raw == 0 {
            return Self::default();
        }
        let clamped = raw.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u32::try_from(clamped).unwrap_or(Self::DEFAULT))
    }

    /// Parses free-form form input.
    ///
    /// Reads an optional sign and the leading run of digits, ignoring anything
    /// after it (`"15pts"` is 15). Input without leading digits falls back to
    /// the default.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..end];
        if digits.is_empty() {
            return Self::default();
        }
        let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
        Self::clamped(if negative { -magnitude } else { magnitude })
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Points {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<i64> for Points {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<Points> for u32 {
    fn from(points: Points) -> Self {
        points.0
    }
}

impl fmt::Debug for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Points({})", self.0)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question fields as entered by an editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionDraft {
    pub prompt: String,
    pub expected_answer: String,
    pub description: String,
    pub hints: Vec<String>,
    pub points: Points,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(prompt: impl Into<String>, expected_answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            expected_answer: expected_answer.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hints = hints.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: Points) -> Self {
        self.points = points;
        self
    }

    /// Trims text fields and drops blank hints.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyAnswer`
    /// when a required field is blank after trimming.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        let prompt = self.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let expected_answer = self.expected_answer.trim().to_owned();
        if expected_answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        let hints = self
            .hints
            .iter()
            .map(|hint| hint.trim())
            .filter(|hint| !hint.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(ValidatedQuestion {
            prompt,
            expected_answer,
            description: self.description.trim().to_owned(),
            hints,
            points: self.points,
        })
    }
}

/// Normalized question content that has not been placed in a sequence yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    prompt: String,
    expected_answer: String,
    description: String,
    hints: Vec<String>,
    points: Points,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign(self, id: QuestionId, step: u32) -> Question {
        Question {
            id,
            step,
            prompt: self.prompt,
            expected_answer: self.expected_answer,
            description: self.description,
            hints: self.hints,
            points: self.points,
        }
    }
}

/// One challenge in the linear sequence.
///
/// Serialized with the property names used by the browser build
/// (`question`, `correctAnswer`) so previously stored collections load as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    #[serde(default)]
    step: u32,
    #[serde(rename = "question")]
    prompt: String,
    #[serde(rename = "correctAnswer")]
    expected_answer: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    points: Points,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn expected_answer(&self) -> &str {
        &self.expected_answer
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    #[must_use]
    pub fn points(&self) -> Points {
        self.points
    }

    /// Whether a decoded scan answers this question.
    #[must_use]
    pub fn is_answered_by(&self, scanned: &str) -> bool {
        scan::answers_match(scanned, &self.expected_answer)
    }

    /// Replaces the content while keeping identity and position.
    #[must_use]
    pub fn with_content(self, content: ValidatedQuestion) -> Self {
        content.assign(self.id, self.step)
    }
}

/// Rewrites `step` as a dense 1-based sequence in slice order.
pub fn renumber(questions: &mut [Question]) {
    for (index, question) in questions.iter_mut().enumerate() {
        question.step = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
}

/// Next step number for a question appended to a sequence of `len` entries.
#[must_use]
pub fn next_step(len: usize) -> u32 {
    u32::try_from(len + 1).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
