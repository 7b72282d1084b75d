use std::env;

/// Tunables for a quiz session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    /// Base URL of the question service.
    pub base_url: String,
    /// Questions fetched per session.
    pub batch_size: u8,
    /// Per-question share of the session countdown budget.
    pub seconds_per_question: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opentdb.com".to_string(),
            batch_size: 10,
            seconds_per_question: 10,
        }
    }
}

impl QuizConfig {
    /// Read overrides from the environment, falling back to the defaults.
    ///
    /// Recognized variables: `TRIVIA_API_BASE_URL`, `TRIVIA_BATCH_SIZE`,
    /// `TRIVIA_SECONDS_PER_QUESTION`. Unparseable or zero numeric values
    /// are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("TRIVIA_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let batch_size = env::var("TRIVIA_BATCH_SIZE")
            .ok()
            .and_then(|value| value.parse::<u8>().ok())
            .filter(|parsed| *parsed > 0)
            .unwrap_or(defaults.batch_size);
        let seconds_per_question = env::var("TRIVIA_SECONDS_PER_QUESTION")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|parsed| *parsed > 0)
            .unwrap_or(defaults.seconds_per_question);

        Self {
            base_url,
            batch_size,
            seconds_per_question,
        }
    }
}
