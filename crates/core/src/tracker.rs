use std::collections::HashSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    AnswerSubmission, Attempt, Decision, Level, LevelError, Pace, QuestionId, ReasonCode,
};
use crate::settings::EngineSettings;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Caller-input validation failures raised by the tracker.
///
/// A rejected submission never mutates the tracker.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("invalid level: {0}")]
    InvalidLevel(#[from] LevelError),

    #[error("answer is for level {submitted} but the session is serving {current}")]
    LevelMismatch { current: Level, submitted: Level },

    #[error("time spent must be non-negative and finite, got {provided}")]
    InvalidDuration { provided: f64 },

    #[error("pace thresholds must be non-negative, finite and fast <= slow, got fast={fast} slow={slow}")]
    InvalidThreshold { fast: f64, slow: f64 },

    #[error("question {0} was already answered in this session")]
    DuplicateQuestion(QuestionId),
}

//
// ─── TRANSITION TABLE ──────────────────────────────────────────────────────────
//

/// The level transition function.
///
/// Pure and total: every `(level, correctness, pace)` combination maps to a
/// tier inside `C1..=C6` together with the reason for the move.
///
/// ```
/// # use quiz_core::model::{Level, Pace, ReasonCode};
/// # use quiz_core::tracker::next_level;
/// assert_eq!(
///     next_level(Level::C3, true, Pace::Fast),
///     (Level::C5, ReasonCode::CorrectFastPromote)
/// );
/// assert_eq!(
///     next_level(Level::C1, false, Pace::Slow),
///     (Level::C1, ReasonCode::IncorrectSlowDemote)
/// );
/// ```
#[must_use]
pub fn next_level(current: Level, is_correct: bool, pace: Pace) -> (Level, ReasonCode) {
    let reason = ReasonCode::for_outcome(is_correct, pace);
    (reason.apply(current), reason)
}

//
// ─── SESSION HISTORY ───────────────────────────────────────────────────────────
//

/// Append-only, ordered record of the attempts in one session.
///
/// Derefs to `[Attempt]` for reading; only the owning tracker state can append.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionHistory {
    attempts: Vec<Attempt>,
    #[serde(skip)]
    seen: HashSet<QuestionId>,
}

impl SessionHistory {
    #[must_use]
    pub fn as_slice(&self) -> &[Attempt] {
        &self.attempts
    }

    #[must_use]
    pub fn contains_question(&self, question_id: &QuestionId) -> bool {
        self.seen.contains(question_id)
    }

    fn push(&mut self, attempt: Attempt) {
        self.seen.insert(attempt.question_id().clone());
        self.attempts.push(attempt);
    }
}

impl Deref for SessionHistory {
    type Target = [Attempt];

    fn deref(&self) -> &Self::Target {
        &self.attempts
    }
}

impl AsRef<[Attempt]> for SessionHistory {
    fn as_ref(&self) -> &[Attempt] {
        &self.attempts
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Persistable form of a session.
///
/// Only the starting level and the attempts are stored; the current level and
/// decision log are re-derived by replaying, which also re-validates the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub starting_level: Level,
    pub attempts: Vec<Attempt>,
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Live view of a running session, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub answered: usize,
    pub correct: usize,
    /// Correct answers in a row at the end of the history.
    pub current_streak: usize,
    pub current_level: Level,
}

//
// ─── TRACKER STATE ─────────────────────────────────────────────────────────────
//

/// Validated, not yet applied outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    attempt: Attempt,
    decision: Decision,
    pace: Pace,
}

impl Transition {
    #[must_use]
    pub fn decision(&self) -> Decision {
        self.decision
    }

    #[must_use]
    pub fn pace(&self) -> Pace {
        self.pace
    }

    #[must_use]
    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }
}

/// Explicit state of one quiz session: current tier plus ordered history.
///
/// Every mutation goes through [`TrackerState::submit`], which either applies
/// fully (one attempt appended, level updated, decision logged) or not at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerState {
    starting_level: Level,
    current_level: Level,
    history: SessionHistory,
    decisions: Vec<Decision>,
}

impl TrackerState {
    #[must_use]
    pub fn new(starting_level: Level) -> Self {
        Self {
            starting_level,
            current_level: starting_level,
            history: SessionHistory::default(),
            decisions: Vec::new(),
        }
    }

    /// Rebuilds a state by re-submitting stored attempts in order.
    ///
    /// # Errors
    ///
    /// Returns the first `TrackerError` a stored attempt triggers, e.g.
    /// `LevelMismatch` if the attempts do not follow the transition rules.
    pub fn replay<'a>(
        starting_level: Level,
        attempts: impl IntoIterator<Item = &'a Attempt>,
    ) -> Result<Self, TrackerError> {
        let mut state = Self::new(starting_level);
        for attempt in attempts {
            state.submit(&attempt.to_submission())?;
        }
        Ok(state)
    }

    /// Rebuilds a state from its persisted form.
    ///
    /// # Errors
    ///
    /// See [`TrackerState::replay`].
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Result<Self, TrackerError> {
        Self::replay(snapshot.starting_level, &snapshot.attempts)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            starting_level: self.starting_level,
            attempts: self.history.as_slice().to_vec(),
        }
    }

    #[must_use]
    pub fn starting_level(&self) -> Level {
        self.starting_level
    }

    #[must_use]
    pub fn current_level(&self) -> Level {
        self.current_level
    }

    #[must_use]
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Decision log, one entry per attempt, in the same order as the history.
    #[must_use]
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    #[must_use]
    pub fn last_decision(&self) -> Option<&Decision> {
        self.decisions.last()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let correct = self.history.iter().filter(|a| a.is_correct()).count();
        let current_streak = self
            .history
            .iter()
            .rev()
            .take_while(|a| a.is_correct())
            .count();

        SessionProgress {
            answered: self.history.len(),
            correct,
            current_streak,
            current_level: self.current_level,
        }
    }

    /// Validates a submission and computes its outcome without touching the state.
    ///
    /// # Errors
    ///
    /// Checks run in this order and stop at the first failure:
    /// - `LevelMismatch` if the answer is not for the level currently served
    /// - `InvalidDuration` if `time_spent` is negative or not finite
    /// - `InvalidThreshold` if a threshold is negative, not finite, or fast > slow
    /// - `DuplicateQuestion` if the question was already answered
    pub fn plan(&self, submission: &AnswerSubmission) -> Result<Transition, TrackerError> {
        if submission.question_level != self.current_level {
            return Err(TrackerError::LevelMismatch {
                current: self.current_level,
                submitted: submission.question_level,
            });
        }

        let time_spent = submission.time_spent;
        if !time_spent.is_finite() || time_spent < 0.0 {
            return Err(TrackerError::InvalidDuration {
                provided: time_spent,
            });
        }

        let fast = submission.time_fast_threshold;
        let slow = submission.time_slow_threshold;
        if !fast.is_finite() || !slow.is_finite() || fast < 0.0 || fast > slow {
            return Err(TrackerError::InvalidThreshold { fast, slow });
        }

        if self.history.contains_question(&submission.question_id) {
            return Err(TrackerError::DuplicateQuestion(
                submission.question_id.clone(),
            ));
        }

        let pace = submission.pace();
        let (next, reason) = next_level(self.current_level, submission.is_correct, pace);

        Ok(Transition {
            attempt: Attempt::from_submission(submission),
            decision: Decision {
                next_level: next,
                reason,
                previous_level: self.current_level,
            },
            pace,
        })
    }

    /// Validates and applies one answer, returning the decision taken.
    ///
    /// # Errors
    ///
    /// See [`TrackerState::plan`]. On error the state is left untouched.
    pub fn submit(&mut self, submission: &AnswerSubmission) -> Result<Decision, TrackerError> {
        let transition = match self.plan(submission) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::debug!(
                    question_id = %submission.question_id,
                    current_level = %self.current_level,
                    error = %err,
                    "answer rejected"
                );
                return Err(err);
            }
        };

        let Transition {
            attempt,
            decision,
            pace,
        } = transition;

        tracing::debug!(
            question_id = %attempt.question_id(),
            previous_level = %decision.previous_level,
            next_level = %decision.next_level,
            reason = %decision.reason,
            pace = ?pace,
            saturated = decision.is_saturated(),
            "level decision"
        );

        self.history.push(attempt);
        self.decisions.push(decision);
        self.current_level = decision.next_level;
        Ok(decision)
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

//
// ─── DIFFICULTY TRACKER ────────────────────────────────────────────────────────
//

/// Owns the state of one quiz session and decides the level of each next question.
///
/// # Examples
///
/// ```
/// # use quiz_core::model::{AnswerSubmission, Level, ReasonCode};
/// # use quiz_core::tracker::DifficultyTracker;
/// let mut tracker = DifficultyTracker::new();
/// assert_eq!(tracker.current_level(), Level::C3);
///
/// let decision = tracker.submit_answer(AnswerSubmission::new(
///     "q1", Level::C3, true, 10.0, 15.0, 40.0,
/// ))?;
/// assert_eq!(decision.next_level, Level::C5);
/// assert_eq!(decision.reason, ReasonCode::CorrectFastPromote);
/// assert_eq!(tracker.history().len(), 1);
/// # Ok::<(), quiz_core::tracker::TrackerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DifficultyTracker {
    state: TrackerState,
}

impl DifficultyTracker {
    /// Tracker starting at the middle tier (C3).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_at(level: Level) -> Self {
        Self {
            state: TrackerState::new(level),
        }
    }

    /// Tracker starting at the tier with the given one-based index, or C3 when `None`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidLevel` if the index is outside `1..=6`.
    pub fn create(starting_level: Option<u8>) -> Result<Self, TrackerError> {
        let level = match starting_level {
            Some(index) => Level::from_index(index)?,
            None => Level::default(),
        };
        Ok(Self::starting_at(level))
    }

    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::starting_at(settings.starting_level())
    }

    #[must_use]
    pub fn from_state(state: TrackerState) -> Self {
        Self { state }
    }

    /// Restores a tracker from a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first `TrackerError` produced while replaying the attempts.
    pub fn restore(snapshot: &SessionSnapshot) -> Result<Self, TrackerError> {
        TrackerState::from_snapshot(snapshot).map(Self::from_state)
    }

    /// Record an answer and move to the next level.
    ///
    /// # Errors
    ///
    /// Returns `LevelMismatch`, `InvalidDuration`, `InvalidThreshold` or
    /// `DuplicateQuestion`; the tracker is unchanged in every error case.
    pub fn submit_answer(&mut self, submission: AnswerSubmission) -> Result<Decision, TrackerError> {
        self.state.submit(&submission)
    }

    /// Like [`submit_answer`](Self::submit_answer) but only reports what would happen.
    ///
    /// # Errors
    ///
    /// Same validation as `submit_answer`.
    pub fn preview(&self, submission: &AnswerSubmission) -> Result<Decision, TrackerError> {
        self.state.plan(submission).map(|t| t.decision())
    }

    #[must_use]
    pub fn current_level(&self) -> Level {
        self.state.current_level()
    }

    #[must_use]
    pub fn history(&self) -> &[Attempt] {
        self.state.history().as_slice()
    }

    #[must_use]
    pub fn decisions(&self) -> &[Decision] {
        self.state.decisions()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.state.progress()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> TrackerState {
        self.state
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
