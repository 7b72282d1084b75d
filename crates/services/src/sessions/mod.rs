mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use service::{
    AnswerOutcome, LoadOutcome, QuizSession, QuizStatus, SessionToken, TimeoutOutcome,
};
pub use workflow::QuizLoopService;
