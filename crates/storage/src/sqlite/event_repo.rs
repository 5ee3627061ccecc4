use async_trait::async_trait;
use chrono::{DateTime, Utc};
use latin_core::model::ProgressEvent;
use sqlx::SqliteConnection;

use super::{
    SqliteRepository,
    mapping::{conn, map_event_row, ser},
};
use crate::repository::{ProgressEventRecord, ProgressEventRepository, StorageError};

pub(super) async fn insert_event(
    db: &mut SqliteConnection,
    key: &str,
    event: &ProgressEvent,
    recorded_at: DateTime<Utc>,
) -> Result<i64, StorageError> {
    let payload = serde_json::to_string(event).map_err(ser)?;
    let res = sqlx::query(
        r"
            INSERT INTO progress_events (progress_key, kind, payload, recorded_at)
            VALUES (?1, ?2, ?3, ?4)
        ",
    )
    .bind(key)
    .bind(event.kind())
    .bind(payload)
    .bind(recorded_at)
    .execute(&mut *db)
    .await
    .map_err(conn)?;

    Ok(res.last_insert_rowid())
}

#[async_trait]
impl ProgressEventRepository for SqliteRepository {
    async fn append_event(
        &self,
        key: &str,
        event: &ProgressEvent,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut db = self.pool.acquire().await.map_err(conn)?;
        insert_event(&mut *db, key, event, recorded_at).await
    }

    async fn list_events(&self, key: &str) -> Result<Vec<ProgressEventRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, progress_key, kind, payload, recorded_at
                FROM progress_events
                WHERE progress_key = ?1
                ORDER BY id ASC
            ",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_event_row).collect()
    }
}
