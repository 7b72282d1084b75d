use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while ingesting a raw question into the session model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyQuestionText,

    #[error("correct answer is empty")]
    EmptyCorrectAnswer,

    #[error("question carries no incorrect answers")]
    NoIncorrectAnswers,

    #[error("answer choices are not a permutation of the answer set")]
    ChoicesMismatch,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty rating as reported by the question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{label}")
    }
}

//
// ─── RAW QUESTION ──────────────────────────────────────────────────────────────
//

/// Wire shape of a single question as delivered by the question source.
///
/// All text fields are untrusted third-party content and may carry HTML
/// entities or markup; they must never be rendered as markup downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawQuestion {
    pub category: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A quiz question, immutable once ingested.
///
/// `answer_choices` is computed exactly once at ingestion time (the caller
/// supplies the shuffled permutation) and never recomputed for this instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    category: String,
    difficulty: Difficulty,
    text: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
    answer_choices: Vec<String>,
}

impl Question {
    /// Ingest a raw question together with its shuffled answer choices.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any text field is blank, the incorrect
    /// answer list is empty, or `answer_choices` is not a permutation of
    /// `{correct_answer} ∪ incorrect_answers`.
    pub fn new(raw: RawQuestion, answer_choices: Vec<String>) -> Result<Self, QuestionError> {
        if raw.question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestionText);
        }
        if raw.correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }
        if raw.incorrect_answers.is_empty() {
            return Err(QuestionError::NoIncorrectAnswers);
        }

        let mut expected: Vec<&str> = raw
            .incorrect_answers
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(raw.correct_answer.as_str()))
            .collect();
        let mut got: Vec<&str> = answer_choices.iter().map(String::as_str).collect();
        expected.sort_unstable();
        got.sort_unstable();
        if expected != got {
            return Err(QuestionError::ChoicesMismatch);
        }

        Ok(Self {
            category: raw.category,
            difficulty: raw.difficulty,
            text: raw.question,
            correct_answer: raw.correct_answer,
            incorrect_answers: raw.incorrect_answers,
            answer_choices,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    /// The fixed presentation order of this question's answers.
    #[must_use]
    pub fn answer_choices(&self) -> &[String] {
        &self.answer_choices
    }

    /// Exact string comparison against the correct answer; no normalization.
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
