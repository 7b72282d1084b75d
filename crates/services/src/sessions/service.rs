use chrono::{DateTime, Duration, Utc};
use std::fmt;

use trivia_core::model::Question;

use crate::error::QuizError;
use super::progress::QuizProgress;

//
// ─── STATUS & TOKENS ───────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    Idle,
    Loading,
    Active,
    Error,
    Finished,
}

/// Identifies one load attempt and the session generation it produces.
///
/// Every `begin_loading` issues a fresh token; resolutions and timer signals
/// carrying a stale token are ignored. This is what keeps a superseded fetch
/// or an orphaned countdown from mutating a newer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

/// Result of resolving a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The batch was installed and the session is now active.
    Started,
    /// The load failed; the session is in the error state.
    Failed,
    /// A newer `begin_loading` superseded this attempt; nothing changed.
    Superseded,
}

/// Result of a timeout signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// The countdown expired against the live session; it is now finished.
    Finished,
    /// Stale or out-of-state signal; nothing changed.
    Ignored,
}

/// What `submit_answer` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub finished: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-run quiz session state machine.
///
/// All mutation funnels through one advance/finish transition pair, so a
/// question can never be advanced twice no matter how user input and the
/// countdown interleave. Starting a new game fully replaces the state; score
/// and position never carry over.
pub struct QuizSession {
    status: QuizStatus,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    hint_revealed: bool,
    generation: u64,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// Where `advance` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advanced {
    Next,
    Finished,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: QuizStatus::Idle,
            questions: Vec::new(),
            current: 0,
            score: 0,
            hint_revealed: false,
            generation: 0,
            started_at: None,
            finished_at: None,
        }
    }

    //
    // ─── LOAD TRANSITIONS ──────────────────────────────────────────────────
    //

    /// Mark the session loading and return the token for this attempt.
    ///
    /// Allowed from any state. Calling again while a fetch is in flight
    /// supersedes the older attempt: its token goes stale and whatever it
    /// resolves to is ignored (last start wins).
    pub fn begin_loading(&mut self) -> SessionToken {
        self.generation += 1;
        self.status = QuizStatus::Loading;
        self.questions.clear();
        self.current = 0;
        self.score = 0;
        self.hint_revealed = false;
        self.started_at = None;
        self.finished_at = None;
        SessionToken(self.generation)
    }

    /// Install a fetched batch and activate the session.
    ///
    /// A stale token is a no-op (`Superseded`). An empty batch is treated as
    /// a failed load; no partial state is exposed.
    pub fn complete_load(
        &mut self,
        token: SessionToken,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> LoadOutcome {
        if token.0 != self.generation || self.status != QuizStatus::Loading {
            return LoadOutcome::Superseded;
        }
        if questions.is_empty() {
            self.status = QuizStatus::Error;
            return LoadOutcome::Failed;
        }

        self.questions = questions;
        self.current = 0;
        self.score = 0;
        self.hint_revealed = false;
        self.status = QuizStatus::Active;
        self.started_at = Some(now);
        self.finished_at = None;
        LoadOutcome::Started
    }

    /// Record a failed load. Stale tokens are ignored.
    pub fn fail_load(&mut self, token: SessionToken) -> LoadOutcome {
        if token.0 != self.generation || self.status != QuizStatus::Loading {
            return LoadOutcome::Superseded;
        }
        self.status = QuizStatus::Error;
        LoadOutcome::Failed
    }

    //
    // ─── PLAY TRANSITIONS ──────────────────────────────────────────────────
    //

    /// Score the given choice against the current question and advance.
    ///
    /// Exact string equality, no normalization. Always moves the session on,
    /// right or wrong.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless the session is active.
    pub fn submit_answer(
        &mut self,
        choice: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, QuizError> {
        if self.status != QuizStatus::Active {
            return Err(QuizError::InvalidTransition);
        }
        let Some(question) = self.questions.get(self.current) else {
            return Err(QuizError::InvalidTransition);
        };

        let correct = question.is_correct(choice);
        if correct {
            self.score += 1;
        }
        let advanced = self.advance(now);

        Ok(AnswerOutcome {
            correct,
            finished: advanced == Advanced::Finished,
        })
    }

    /// Reveal the correct answer for the current question. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless the session is active.
    pub fn reveal_hint(&mut self) -> Result<(), QuizError> {
        if self.status != QuizStatus::Active {
            return Err(QuizError::InvalidTransition);
        }
        self.hint_revealed = true;
        Ok(())
    }

    /// React to the countdown expiring.
    ///
    /// The countdown budget covers the whole session, so a genuine expiry
    /// ends the game without awarding credit. A signal carrying a stale
    /// token, or arriving after the session already left the active state
    /// (an answer won the race, or a new game replaced the session), is a
    /// no-op.
    pub fn handle_timeout(&mut self, token: SessionToken, now: DateTime<Utc>) -> TimeoutOutcome {
        if token.0 != self.generation || self.status != QuizStatus::Active {
            return TimeoutOutcome::Ignored;
        }
        self.finish(now);
        TimeoutOutcome::Finished
    }

    /// The only mutator of `current`. Steps to the next question, or takes
    /// the terminal arm when the last question was just answered.
    fn advance(&mut self, now: DateTime<Utc>) -> Advanced {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.hint_revealed = false;
            Advanced::Next
        } else {
            self.finish(now);
            Advanced::Finished
        }
    }

    /// Terminal transition: clears the question list so stale answers have
    /// nothing left to score against. `current` keeps its last value.
    fn finish(&mut self, now: DateTime<Utc>) {
        self.status = QuizStatus::Finished;
        self.questions.clear();
        self.finished_at = Some(now);
    }

    //
    // ─── READ SURFACE ──────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn hint_revealed(&self) -> bool {
        self.hint_revealed
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.status == QuizStatus::Active {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    /// Token of the live generation; a countdown created for this session
    /// must carry it so its expiry can be matched up later.
    #[must_use]
    pub fn token(&self) -> SessionToken {
        SessionToken(self.generation)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Time spent in the session so far, or total time once finished.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.started_at
            .map(|started| self.finished_at.unwrap_or(now) - started)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == QuizStatus::Finished
    }

    /// Progress snapshot for display. `position` is the 1-based number of
    /// the question currently shown, derived after any advance, so the
    /// counter can never drift from the rendered question.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            position: self.current + 1,
            total: self.total_questions(),
            score: self.score,
            is_finished: self.is_finished(),
        }
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("status", &self.status)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("hint_revealed", &self.hint_revealed)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
