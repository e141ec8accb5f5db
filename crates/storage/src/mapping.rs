//! Row encoding for stored quiz sessions.
//!
//! A session is persisted as one row: timestamps plus the snapshot as a JSON
//! document, the shape a caller would write into a database column.

use chrono::{DateTime, Utc};
use quiz_core::SessionSnapshot;
use quiz_core::model::QuizSessionId;

use crate::repository::{QuizSessionRecord, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionRow {
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub snapshot_json: String,
}

pub(crate) fn record_to_row(record: &QuizSessionRecord) -> Result<SessionRow, StorageError> {
    Ok(SessionRow {
        started_at: record.started_at,
        updated_at: record.updated_at,
        snapshot_json: serde_json::to_string(&record.snapshot).map_err(ser)?,
    })
}

pub(crate) fn row_to_record(
    id: QuizSessionId,
    row: &SessionRow,
) -> Result<QuizSessionRecord, StorageError> {
    let snapshot: SessionSnapshot = serde_json::from_str(&row.snapshot_json).map_err(ser)?;
    Ok(QuizSessionRecord {
        id,
        started_at: row.started_at,
        updated_at: row.updated_at,
        snapshot,
    })
}
