mod question;

pub use question::{Difficulty, Question, QuestionError, RawQuestion};
