#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    DEFAULT_PROGRESS_KEY, InMemoryRepository, ProgressEventRecord, ProgressEventRepository,
    ProgressRepository, ProgressSnapshot, Storage, StorageError,
};
