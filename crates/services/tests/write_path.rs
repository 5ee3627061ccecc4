use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use latin_core::model::{Curriculum, LessonId, ProgressEvent, UserProgress};
use latin_core::time::{fixed_clock, fixed_now};
use services::{ProgressServiceError, ProgressTracker};
use storage::repository::{
    InMemoryRepository, ProgressEventRepository, ProgressRepository, ProgressSnapshot,
    StorageError,
};

const KEY: &str = "write-path";

#[derive(Clone, Copy)]
enum Failure {
    Conflict,
    Connection,
}

/// In-memory records whose combined writes fail a set number of times first.
struct Flaky {
    inner: InMemoryRepository,
    failure: Failure,
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl Flaky {
    fn new(inner: InMemoryRepository, failure: Failure, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failure,
            failures_left: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ProgressRepository for Flaky {
    async fn load_progress(&self, key: &str) -> Result<Option<ProgressSnapshot>, StorageError> {
        self.inner.load_progress(key).await
    }

    async fn save_progress(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        self.inner
            .save_progress(key, progress, expected_revision, now)
            .await
    }

    async fn save_progress_with_event(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        event: &ProgressEvent,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(match self.failure {
                Failure::Conflict => StorageError::Conflict,
                Failure::Connection => StorageError::Connection("disk unavailable".into()),
            });
        }
        self.inner
            .save_progress_with_event(key, progress, expected_revision, event, now)
            .await
    }
}

fn tracker(records: Arc<Flaky>, events: InMemoryRepository) -> ProgressTracker {
    let records: Arc<dyn ProgressRepository> = records;
    let events: Arc<dyn ProgressEventRepository> = Arc::new(events);
    ProgressTracker::new(
        fixed_clock(),
        KEY,
        Arc::new(Curriculum::builtin()),
        records,
        events,
    )
}

#[tokio::test]
async fn one_conflict_is_retried_and_applied_once() {
    let repo = InMemoryRepository::new();
    let records = Flaky::new(repo.clone(), Failure::Conflict, 1);
    let tracker = tracker(Arc::clone(&records), repo.clone());

    let progress = tracker
        .increment_exercise_count(LessonId::new(1), 3)
        .await
        .unwrap();
    assert_eq!(records.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(progress.exercise_count(LessonId::new(1)), 1);
    assert_eq!(progress.xp(), 30);

    let stored = repo.load_progress(KEY).await.unwrap().unwrap();
    assert_eq!(stored.progress, progress);
    assert_eq!(stored.revision, 1);
    assert_eq!(repo.list_events(KEY).await.unwrap().len(), 1);
}

#[tokio::test]
async fn persistent_conflict_surfaces_after_three_attempts() {
    let repo = InMemoryRepository::new();
    let records = Flaky::new(repo.clone(), Failure::Conflict, usize::MAX);
    let tracker = tracker(Arc::clone(&records), repo.clone());

    let err = tracker
        .complete_lesson(LessonId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProgressServiceError::Storage(StorageError::Conflict)
    ));
    assert_eq!(records.attempts.load(Ordering::SeqCst), 3);
    assert!(repo.load_progress(KEY).await.unwrap().is_none());
    assert!(repo.list_events(KEY).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_write_persists_nothing_so_retrying_counts_once() {
    let repo = InMemoryRepository::new();
    let records = Flaky::new(repo.clone(), Failure::Connection, 1);
    let tracker = tracker(records, repo.clone());

    assert!(
        tracker
            .increment_exercise_count(LessonId::new(1), 3)
            .await
            .is_err()
    );
    assert!(repo.load_progress(KEY).await.unwrap().is_none());
    assert!(repo.list_events(KEY).await.unwrap().is_empty());

    let progress = tracker
        .increment_exercise_count(LessonId::new(1), 3)
        .await
        .unwrap();
    assert_eq!(progress.exercise_count(LessonId::new(1)), 1);
    assert_eq!(progress.xp(), 30);

    assert_eq!(tracker.rebuild_from_events().await.unwrap(), progress);
}

#[tokio::test]
async fn rebuild_keeps_records_the_log_does_not_cover() {
    let repo = InMemoryRepository::new();
    let records = Flaky::new(repo.clone(), Failure::Connection, 0);
    let tracker = tracker(records, repo.clone());

    // A record written before any event was logged.
    let mut imported = UserProgress::default();
    imported.complete_lesson(LessonId::new(1));
    imported.increment_exercise_count(LessonId::new(1), 3);
    repo.save_progress(KEY, &imported, 0, fixed_now())
        .await
        .unwrap();

    let err = tracker.rebuild_from_events().await.unwrap_err();
    assert!(matches!(
        err,
        ProgressServiceError::IncompleteEventLog {
            stored_xp: 130,
            replayed_xp: 0
        }
    ));
    let stored = repo.load_progress(KEY).await.unwrap().unwrap();
    assert_eq!(stored.progress, imported);
    assert_eq!(stored.revision, 1);
}
