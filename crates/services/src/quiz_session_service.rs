use std::sync::Arc;

use serde::Serialize;

use quiz_core::model::{AnswerSubmission, Attempt, Decision, Level, QuizSessionId};
use quiz_core::summary::generate_performance_summary_with;
use quiz_core::tracker::SessionProgress;
use quiz_core::{DifficultyTracker, EngineSettings, PerformanceSummary};
use storage::{QuizSessionRecord, QuizSessionRepository};

use crate::Clock;
use crate::error::QuizSessionError;

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Result of answering one question in a stored session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizAnswerResult {
    pub decision: Decision,
    pub progress: SessionProgress,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Runs quiz sessions against a caller-supplied store.
///
/// Every call loads the stored snapshot, rebuilds the tracker, applies the
/// operation and writes the snapshot back. Calls for the same session must be
/// serialized by the caller; different sessions are independent.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    settings: EngineSettings,
    sessions: Arc<dyn QuizSessionRepository>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(sessions: Arc<dyn QuizSessionRepository>) -> Self {
        Self {
            clock: Clock::default(),
            settings: EngineSettings::default(),
            sessions,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Start a new session, at `starting_level` or the configured default.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Storage` if the session cannot be stored.
    pub async fn start_session(
        &self,
        starting_level: Option<Level>,
    ) -> Result<QuizSessionId, QuizSessionError> {
        let settings = match starting_level {
            Some(level) => self.settings.with_starting_level(level),
            None => self.settings,
        };
        let tracker = DifficultyTracker::from_settings(&settings);
        let now = self.clock.now();
        let record = QuizSessionRecord {
            id: QuizSessionId::generate(),
            started_at: now,
            updated_at: now,
            snapshot: tracker.snapshot(),
        };

        self.sessions.insert_session(&record).await?;
        tracing::info!(
            session_id = %record.id,
            starting_level = %settings.starting_level(),
            "quiz session started"
        );
        Ok(record.id)
    }

    /// Apply one graded answer and persist the updated session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `Answer` if the tracker rejects the submission (nothing is written)
    /// - `CorruptSnapshot` if the stored session cannot be replayed
    /// - `Storage` for persistence failures
    pub async fn submit_answer(
        &self,
        id: QuizSessionId,
        submission: AnswerSubmission,
    ) -> Result<QuizAnswerResult, QuizSessionError> {
        let (mut record, mut tracker) = self.load(id).await?;
        let decision = tracker.submit_answer(submission)?;

        record.snapshot = tracker.snapshot();
        record.updated_at = self.clock.now();
        self.sessions.update_session(&record).await?;

        Ok(QuizAnswerResult {
            decision,
            progress: tracker.progress(),
        })
    }

    /// Level the next question should be drawn from.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CorruptSnapshot` or `Storage`.
    pub async fn current_level(&self, id: QuizSessionId) -> Result<Level, QuizSessionError> {
        let (_, tracker) = self.load(id).await?;
        Ok(tracker.current_level())
    }

    /// Ordered attempts answered so far.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CorruptSnapshot` or `Storage`.
    pub async fn history(&self, id: QuizSessionId) -> Result<Vec<Attempt>, QuizSessionError> {
        let (record, _) = self.load(id).await?;
        Ok(record.snapshot.attempts)
    }

    /// Decision log, one entry per attempt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CorruptSnapshot` or `Storage`.
    pub async fn decisions(&self, id: QuizSessionId) -> Result<Vec<Decision>, QuizSessionError> {
        let (_, tracker) = self.load(id).await?;
        Ok(tracker.decisions().to_vec())
    }

    /// Live performance report for a running session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CorruptSnapshot` or `Storage`.
    pub async fn summary(&self, id: QuizSessionId) -> Result<PerformanceSummary, QuizSessionError> {
        let (_, tracker) = self.load(id).await?;
        Ok(self.summarize(&tracker))
    }

    /// End a session: produce its final report and drop it from the store.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CorruptSnapshot` or `Storage`.
    pub async fn finish_session(
        &self,
        id: QuizSessionId,
    ) -> Result<PerformanceSummary, QuizSessionError> {
        let (_, tracker) = self.load(id).await?;
        let summary = self.summarize(&tracker);
        self.sessions.delete_session(id).await?;

        tracing::info!(
            session_id = %id,
            answered = summary.total_attempts(),
            accuracy = summary.overall_accuracy(),
            mastery_signal = %summary.mastery_signal(),
            "quiz session finished"
        );
        Ok(summary)
    }

    fn summarize(&self, tracker: &DifficultyTracker) -> PerformanceSummary {
        generate_performance_summary_with(
            tracker.history(),
            tracker.current_level(),
            self.settings.mastery_streak(),
        )
    }

    async fn load(
        &self,
        id: QuizSessionId,
    ) -> Result<(QuizSessionRecord, DifficultyTracker), QuizSessionError> {
        let record = self.sessions.get_session(id).await?;
        match DifficultyTracker::restore(&record.snapshot) {
            Ok(tracker) => Ok((record, tracker)),
            Err(err) => {
                tracing::warn!(session_id = %id, error = %err, "stored quiz session failed to replay");
                Err(QuizSessionError::CorruptSnapshot(err))
            }
        }
    }
}
