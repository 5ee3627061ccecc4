use async_trait::async_trait;
use chrono::{DateTime, Utc};
use latin_core::model::{ProgressEvent, UserProgress};
use sqlx::SqliteConnection;

use super::{
    SqliteRepository,
    event_repo::insert_event,
    mapping::{conn, map_progress_row, revision_to_i64, ser},
};
use crate::repository::{ProgressRepository, ProgressSnapshot, StorageError};

/// Guarded upsert of one record. Zero affected rows means a stale revision.
async fn write_record(
    db: &mut SqliteConnection,
    key: &str,
    progress: &UserProgress,
    expected_revision: u64,
    now: DateTime<Utc>,
) -> Result<u64, StorageError> {
    let payload = serde_json::to_string(progress).map_err(ser)?;
    let next = expected_revision
        .checked_add(1)
        .ok_or_else(|| StorageError::Serialization("revision overflow".into()))?;

    let res = if expected_revision == 0 {
        sqlx::query(
            r"
                INSERT INTO progress_records (key, payload, revision, updated_at)
                VALUES (?1, ?2, 1, ?3)
                ON CONFLICT(key) DO NOTHING
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(now)
        .execute(&mut *db)
        .await
    } else {
        sqlx::query(
            r"
                UPDATE progress_records
                SET payload = ?2, revision = ?4, updated_at = ?5
                WHERE key = ?1 AND revision = ?3
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(revision_to_i64(expected_revision)?)
        .bind(revision_to_i64(next)?)
        .bind(now)
        .execute(&mut *db)
        .await
    }
    .map_err(conn)?;

    if res.rows_affected() == 0 {
        tracing::warn!(key, expected_revision, "stale progress write rejected");
        return Err(StorageError::Conflict);
    }
    Ok(next)
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self, key: &str) -> Result<Option<ProgressSnapshot>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT payload, revision, updated_at
                FROM progress_records
                WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn save_progress(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let mut db = self.pool.acquire().await.map_err(conn)?;
        write_record(&mut *db, key, progress, expected_revision, now).await
    }

    async fn save_progress_with_event(
        &self,
        key: &str,
        progress: &UserProgress,
        expected_revision: u64,
        event: &ProgressEvent,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        // Dropping `tx` on an early return rolls both writes back.
        let revision = write_record(&mut *tx, key, progress, expected_revision, now).await?;
        insert_event(&mut *tx, key, event, now).await?;

        tx.commit().await.map_err(conn)?;
        Ok(revision)
    }
}
