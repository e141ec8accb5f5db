//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::TrackerError;
use storage::StorageError;

/// Errors emitted by `QuizSessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz session not found")]
    NotFound,
    /// The submitted answer was rejected; the stored session is unchanged.
    #[error(transparent)]
    Answer(#[from] TrackerError),
    /// The stored snapshot no longer replays cleanly.
    #[error("stored quiz session is inconsistent: {0}")]
    CorruptSnapshot(#[source] TrackerError),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for QuizSessionError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => QuizSessionError::NotFound,
            other => QuizSessionError::Storage(other),
        }
    }
}
