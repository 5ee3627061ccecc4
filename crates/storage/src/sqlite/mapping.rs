use chrono::{DateTime, Utc};
use latin_core::model::{ProgressEvent, UserProgress};
use sqlx::Row;

use crate::repository::{ProgressEventRecord, ProgressSnapshot, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn revision_to_i64(v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization("revision overflow".into()))
}

fn revision_from_i64(v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization("revision sign overflow".into()))
}

pub(crate) fn map_progress_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ProgressSnapshot, StorageError> {
    let payload: String = row.try_get("payload").map_err(ser)?;
    let progress: UserProgress = serde_json::from_str(&payload).map_err(ser)?;
    let revision = revision_from_i64(row.try_get("revision").map_err(ser)?)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(ser)?;
    Ok(ProgressSnapshot {
        progress,
        revision,
        updated_at,
    })
}

pub(crate) fn map_event_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<ProgressEventRecord, StorageError> {
    let payload: String = row.try_get("payload").map_err(ser)?;
    let event: ProgressEvent = serde_json::from_str(&payload).map_err(ser)?;
    let kind: String = row.try_get("kind").map_err(ser)?;
    if kind != event.kind() {
        return Err(StorageError::Serialization(format!(
            "event kind {kind} does not match payload {}",
            event.kind()
        )));
    }
    Ok(ProgressEventRecord {
        id: row.try_get("id").map_err(ser)?,
        key: row.try_get("progress_key").map_err(ser)?,
        event,
        recorded_at: row.try_get("recorded_at").map_err(ser)?,
    })
}
