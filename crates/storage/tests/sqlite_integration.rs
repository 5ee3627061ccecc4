use chrono::Duration;
use latin_core::model::{FlashcardId, LessonId, ProgressEvent, ReadingId, UserProgress};
use latin_core::time::fixed_now;
use storage::repository::{
    DEFAULT_PROGRESS_KEY, ProgressEventRepository, ProgressRepository, Storage, StorageError,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_record_shape() {
    let repo = connect("memdb_progress_roundtrip").await;

    let mut progress = UserProgress::default();
    progress.complete_lesson(LessonId::new(1));
    progress.update_vocab_mastery(&FlashcardId::new("l1-1"), true);
    progress.increment_exercise_count(LessonId::new(1), 2);
    progress.complete_reading(&ReadingId::new("r1"));

    let rev = repo
        .save_progress(DEFAULT_PROGRESS_KEY, &progress, 0, fixed_now())
        .await
        .expect("save");
    assert_eq!(rev, 1);

    let snapshot = repo
        .load_progress(DEFAULT_PROGRESS_KEY)
        .await
        .expect("load")
        .expect("present");
    assert_eq!(snapshot.progress, progress);
    assert_eq!(snapshot.revision, 1);
    assert_eq!(snapshot.updated_at, fixed_now());
}

#[tokio::test]
async fn sqlite_rejects_stale_revision() {
    let repo = connect("memdb_progress_conflict").await;
    let progress = UserProgress::default();

    repo.save_progress("k", &progress, 0, fixed_now())
        .await
        .unwrap();
    let later = fixed_now() + Duration::minutes(1);
    assert_eq!(
        repo.save_progress("k", &progress, 1, later).await.unwrap(),
        2
    );

    let err = repo
        .save_progress("k", &progress, 1, later)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let err = repo
        .save_progress("k", &progress, 0, later)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let snapshot = repo.load_progress("k").await.unwrap().unwrap();
    assert_eq!(snapshot.revision, 2);
    assert_eq!(snapshot.updated_at, later);
}

#[tokio::test]
async fn sqlite_surfaces_corrupt_payload() {
    let repo = connect("memdb_progress_corrupt").await;
    sqlx::query(
        "INSERT INTO progress_records (key, payload, revision, updated_at) VALUES (?1, ?2, 1, ?3)",
    )
    .bind("broken")
    .bind("{not json")
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();

    let err = repo.load_progress("broken").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_event_log_is_ordered_per_key() {
    let repo = connect("memdb_progress_events").await;
    let first = ProgressEvent::LessonCompleted {
        lesson: LessonId::new(1),
    };
    let second = ProgressEvent::VocabReviewed {
        word: FlashcardId::new("l1-1"),
        success: true,
    };

    let a = repo.append_event("k", &first, fixed_now()).await.unwrap();
    repo.append_event("other", &second, fixed_now())
        .await
        .unwrap();
    let b = repo
        .append_event("k", &second, fixed_now() + Duration::seconds(1))
        .await
        .unwrap();
    assert!(b > a);

    let records = repo.list_events("k").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].event, first);
    assert_eq!(records[1].event, second);
    assert!(records.iter().all(|r| r.key == "k"));

    let replayed = UserProgress::replay(records.iter().map(|r| &r.event), Some(LessonId::new(40)));
    assert!(replayed.is_lesson_completed(LessonId::new(1)));
    assert_eq!(replayed.mastery(&FlashcardId::new("l1-1")), 0.25);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_progress_migrate").await;
    repo.migrate().await.expect("second migrate");

    let storage = Storage::sqlite("sqlite:file:memdb_progress_migrate?mode=memory&cache=shared")
        .await
        .expect("storage over migrated db");
    assert!(storage.progress.load_progress("none").await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_record_and_event_commit_together() {
    let repo = connect("memdb_progress_atomic").await;
    let first = ProgressEvent::ExerciseSession {
        lesson: LessonId::new(1),
        score: 3,
    };
    let mut progress = UserProgress::default();
    progress.increment_exercise_count(LessonId::new(1), 3);

    let rev = repo
        .save_progress_with_event("k", &progress, 0, &first, fixed_now())
        .await
        .unwrap();
    assert_eq!(rev, 1);
    assert_eq!(repo.list_events("k").await.unwrap().len(), 1);

    sqlx::query(
        r"
            CREATE TRIGGER reject_events BEFORE INSERT ON progress_events
            BEGIN
                SELECT RAISE(ABORT, 'event log unavailable');
            END
        ",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let mut next = progress.clone();
    next.increment_exercise_count(LessonId::new(1), 3);
    let err = repo
        .save_progress_with_event("k", &next, 1, &first, fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));

    // The record update rolled back with the failed append.
    let snapshot = repo.load_progress("k").await.unwrap().unwrap();
    assert_eq!(snapshot.revision, 1);
    assert_eq!(snapshot.progress, progress);
    assert_eq!(repo.list_events("k").await.unwrap().len(), 1);
}
