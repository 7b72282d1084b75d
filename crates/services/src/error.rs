//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::model::QuestionError;

/// Errors emitted while fetching a question batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("question service returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question service answered with error code {0}")]
    Api(u8),
    #[error("question service returned an empty batch")]
    EmptyBatch,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the quiz session and its orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// An action arrived while the session state does not permit it.
    /// A caller bug: log and ignore, never crash the session.
    #[error("action not permitted in the current session state")]
    InvalidTransition,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
