//! Shared error types for the services crate.

use thiserror::Error;

use latin_core::model::LessonId;
use latin_core::status::Stage;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `TextGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("text generation is not configured")]
    Disabled,
    #[error("text generation returned an empty response")]
    EmptyResponse,
    #[error("text generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("text generation returned an unusable payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ProgressTracker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("lesson {0} has no challenge")]
    UnknownChallenge(LessonId),
    #[error("{stage:?} stage of lesson {lesson} is locked")]
    StageLocked { lesson: LessonId, stage: Stage },
    #[error("event log replays to {replayed_xp} xp but the stored record has {stored_xp}")]
    IncompleteEventLog { stored_xp: u64, replayed_xp: u64 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
