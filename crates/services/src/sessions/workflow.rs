use std::sync::Arc;

use log::{debug, error, warn};

use trivia_core::Clock;
use trivia_core::model::{Question, RawQuestion};

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::shuffle::shuffled;
use crate::source::QuestionSource;
use super::service::{LoadOutcome, QuizSession};

/// Orchestrates fetch, ingestion, and session start.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    config: QuizConfig,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            config: QuizConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: QuizConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Total countdown budget for a session of `total_questions`.
    #[must_use]
    pub fn time_budget(&self, total_questions: usize) -> u32 {
        u32::try_from(total_questions)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.config.seconds_per_question)
    }

    /// Fetch one batch and ingest it. Each question receives its shuffled
    /// answer choices here, exactly once.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Fetch` for transport/payload failures and
    /// `QuizError::Question` if a question fails ingestion validation.
    pub async fn fetch_batch(&self) -> Result<Vec<Question>, QuizError> {
        let raw = self.source.fetch_questions(self.config.batch_size).await?;
        debug!("fetched a batch of {} questions", raw.len());
        raw.into_iter().map(ingest).collect()
    }

    /// Run the whole start flow against `session`: mark it loading, fetch,
    /// then resolve with the batch or the failure. If a newer start was
    /// issued meanwhile, this one resolves into a no-op.
    ///
    /// # Errors
    ///
    /// Returns the fetch/ingestion error after recording it on the session.
    pub async fn start(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        let token = session.begin_loading();
        match self.fetch_batch().await {
            Ok(questions) => {
                let outcome = session.complete_load(token, questions, self.clock.now());
                if outcome == LoadOutcome::Superseded {
                    warn!("quiz batch discarded: a newer start superseded this one");
                }
                Ok(())
            }
            Err(err) => {
                error!("quiz load failed: {err}");
                session.fail_load(token);
                Err(err)
            }
        }
    }
}

fn ingest(raw: RawQuestion) -> Result<Question, QuizError> {
    let mut pool = raw.incorrect_answers.clone();
    pool.push(raw.correct_answer.clone());
    let choices = shuffled(&pool);
    Ok(Question::new(raw, choices)?)
}
