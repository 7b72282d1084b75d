#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod sessions;
pub mod shuffle;
pub mod source;
pub mod timer;

pub use trivia_core::Clock;

pub use config::QuizConfig;
pub use error::{FetchError, QuizError};
pub use sessions::{
    AnswerOutcome, LoadOutcome, QuizLoopService, QuizProgress, QuizSession, QuizStatus,
    SessionToken, TimeoutOutcome,
};
pub use source::{OpenTriviaClient, QuestionSource};
pub use timer::{CountdownTimer, format_mm_ss};
