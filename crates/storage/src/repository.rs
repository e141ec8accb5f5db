use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::SessionSnapshot;
use quiz_core::model::QuizSessionId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::mapping::{SessionRow, record_to_row, row_to_record};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of one quiz session.
///
/// Only the snapshot is stored; the tracker state is rebuilt from it on load so
/// the engine re-validates whatever comes back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSessionRecord {
    pub id: QuizSessionId,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub snapshot: SessionSnapshot,
}

/// Caller-supplied store for quiz sessions, one row per quiz attempt.
#[async_trait]
pub trait QuizSessionRepository: Send + Sync {
    /// Store a brand-new session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a session with the same id exists.
    async fn insert_session(&self, record: &QuizSessionRecord) -> Result<(), StorageError>;

    /// Overwrite an existing session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session was never inserted.
    async fn update_session(&self, record: &QuizSessionRecord) -> Result<(), StorageError>;

    /// Fetch a session by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_session(&self, id: QuizSessionId) -> Result<QuizSessionRecord, StorageError>;

    /// Remove a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn delete_session(&self, id: QuizSessionId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<QuizSessionId, SessionRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.len().map(|n| n == 0)
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryRepository {
    async fn insert_session(&self, record: &QuizSessionRecord) -> Result<(), StorageError> {
        let row = record_to_row(record)?;
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&record.id) {
            return Err(StorageError::Conflict);
        }
        guard.insert(record.id, row);
        Ok(())
    }

    async fn update_session(&self, record: &QuizSessionRecord) -> Result<(), StorageError> {
        let row = record_to_row(record)?;
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get_mut(&record.id) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn get_session(&self, id: QuizSessionId) -> Result<QuizSessionRecord, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let row = guard.get(&id).ok_or(StorageError::NotFound)?;
        row_to_record(id, row)
    }

    async fn delete_session(&self, id: QuizSessionId) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerSubmission, Level};
    use quiz_core::DifficultyTracker;

    fn build_record(tracker: &DifficultyTracker) -> QuizSessionRecord {
        let now = Utc::now();
        QuizSessionRecord {
            id: QuizSessionId::generate(),
            started_at: now,
            updated_at: now,
            snapshot: tracker.snapshot(),
        }
    }

    #[tokio::test]
    async fn round_trips_session_snapshot() {
        let repo = InMemoryRepository::new();
        let mut tracker = DifficultyTracker::new();
        tracker
            .submit_answer(AnswerSubmission::new("q1", Level::C3, false, 50.0, 15.0, 40.0))
            .unwrap();
        let record = build_record(&tracker);

        repo.insert_session(&record).await.unwrap();
        let fetched = repo.get_session(record.id).await.unwrap();

        assert_eq!(fetched, record);
        let restored = DifficultyTracker::restore(&fetched.snapshot).unwrap();
        assert_eq!(restored.current_level(), Level::C1);
    }

    #[tokio::test]
    async fn insert_twice_conflicts() {
        let repo = InMemoryRepository::new();
        let record = build_record(&DifficultyTracker::new());

        repo.insert_session(&record).await.unwrap();
        let err = repo.insert_session(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn update_requires_existing_row() {
        let repo = InMemoryRepository::new();
        let mut record = build_record(&DifficultyTracker::new());

        let err = repo.update_session(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        repo.insert_session(&record).await.unwrap();
        record.snapshot.starting_level = Level::C5;
        repo.update_session(&record).await.unwrap();

        let fetched = repo.get_session(record.id).await.unwrap();
        assert_eq!(fetched.snapshot.starting_level, Level::C5);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repo = InMemoryRepository::new();
        let record = build_record(&DifficultyTracker::new());
        repo.insert_session(&record).await.unwrap();
        assert_eq!(repo.len().unwrap(), 1);

        repo.delete_session(record.id).await.unwrap();
        assert!(repo.is_empty().unwrap());
        assert!(matches!(
            repo.get_session(record.id).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            repo.delete_session(record.id).await,
            Err(StorageError::NotFound)
        ));
    }
}
