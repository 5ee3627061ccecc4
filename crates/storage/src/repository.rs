use async_trait::async_trait;
use chrono::{DateTime, Utc};
use latin_core::model::{ProgressEvent, UserProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Storage key of the learner record when none is configured.
pub const DEFAULT_PROGRESS_KEY: &str = "lingua_latina_progress_v3_full";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored progress record plus its write version.
///
/// `revision` starts at 1 on the first save and grows by one per write.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub progress: UserProgress,
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

/// One entry of the append-only progress log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEventRecord {
    pub id: i64,
    pub key: String,
    pub event: ProgressEvent,
    pub recorded_at: DateTime<Utc>,
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when the stored payload does not
    /// decode, or other storage errors.
    async fn load_progress(&self, key: &str) -> Result<Option<ProgressSnapshot>, StorageError>;

    /// Replace the record under `key` and return the new revision.
    ///
    /// `expected_revision` is the revision the caller read; `0` means no record
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the stored revision differs from
    /// `expected_revision`.
    async fn save_progress(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError>;

    /// Replace the record and append `event` to the log as one write.
    ///
    /// Either both land or neither does.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the stored revision differs from
    /// `expected_revision`, or other storage errors. Nothing is written on error.
    async fn save_progress_with_event(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        event: &ProgressEvent,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait ProgressEventRepository: Send + Sync {
    /// Append an event and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the event cannot be stored.
    async fn append_event(
        &self,
        key: &str,
        event: &ProgressEvent,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError>;

    /// Events for `key`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn list_events(&self, key: &str) -> Result<Vec<ProgressEventRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<HashMap<String, ProgressSnapshot>>>,
    events: Arc<Mutex<Vec<ProgressEventRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self, key: &str) -> Result<Option<ProgressSnapshot>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save_progress(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let revision = next_revision(&records, key, expected_revision)?;
        records.insert(key.to_owned(), snapshot(progress, revision, now));
        Ok(revision)
    }

    async fn save_progress_with_event(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        event: &ProgressEvent,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        // Lock order: records, then events.
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let revision = next_revision(&records, key, expected_revision)?;
        let mut events = self
            .events
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        push_event(&mut events, key, event, now)?;
        records.insert(key.to_owned(), snapshot(progress, revision, now));
        Ok(revision)
    }
}

fn next_revision(
    records: &HashMap<String, ProgressSnapshot>,
    key: &str,
    expected_revision: u64,
) -> Result<u64, StorageError> {
    let stored = records.get(key).map_or(0, |s| s.revision);
    if stored != expected_revision {
        return Err(StorageError::Conflict);
    }
    Ok(stored + 1)
}

fn snapshot(progress: &UserProgress, revision: u64, now: DateTime<Utc>) -> ProgressSnapshot {
    ProgressSnapshot {
        progress: progress.clone(),
        revision,
        updated_at: now,
    }
}

fn push_event(
    events: &mut Vec<ProgressEventRecord>,
    key: &str,
    event: &ProgressEvent,
    recorded_at: DateTime<Utc>,
) -> Result<i64, StorageError> {
    let id = i64::try_from(events.len() + 1)
        .map_err(|_| StorageError::Serialization("event id overflow".into()))?;
    events.push(ProgressEventRecord {
        id,
        key: key.to_owned(),
        event: event.clone(),
        recorded_at,
    });
    Ok(id)
}

#[async_trait]
impl ProgressEventRepository for InMemoryRepository {
    async fn append_event(
        &self,
        key: &str,
        event: &ProgressEvent,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        push_event(&mut guard, key, event, recorded_at)
    }

    async fn list_events(&self, key: &str) -> Result<Vec<ProgressEventRecord>, StorageError> {
        let guard = self
            .events
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().filter(|r| r.key == key).cloned().collect())
    }
}

/// Aggregates the progress repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub events: Arc<dyn ProgressEventRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let events: Arc<dyn ProgressEventRepository> = Arc::new(repo);
        Self { progress, events }
    }
}
