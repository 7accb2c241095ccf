//! `SQLite` implementation of the `MeditationRepository` trait.

use async_trait::async_trait;
use calmwave_core::{Meditation, MeditationPage, MeditationRepository, NewMeditation, RepositoryError};
use chrono::SubsecRound;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::row_mappers::{MEDITATION_SELECT_COLUMNS, format_timestamp, row_to_meditation};

/// `SQLite` implementation of the `MeditationRepository` trait.
pub struct SqliteMeditationRepository {
    pool: SqlitePool,
}

impl SqliteMeditationRepository {
    /// Create a new `SQLite` meditation repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeditationRepository for SqliteMeditationRepository {
    async fn insert(&self, meditation: &NewMeditation) -> Result<Meditation, RepositoryError> {
        let mut record = meditation.clone().into_meditation();
        // Stored at microsecond precision; return what a later read yields.
        record.created_at = record.created_at.trunc_subsecs(6);
        record.updated_at = record.updated_at.trunc_subsecs(6);
        let script_json = serde_json::to_string(&record.meditation_script)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            "INSERT INTO meditations (id, user_id, user_input, meditation_script, audio_file_path, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(&record.user_id)
        .bind(&record.user_input)
        .bind(script_json)
        .bind(record.audio_file_path.as_deref())
        .bind(format_timestamp(record.created_at))
        .bind(format_timestamp(record.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        debug!(id = %record.id, user_id = %record.user_id, "Meditation stored");
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Meditation, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {MEDITATION_SELECT_COLUMNS} FROM meditations WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?
        .ok_or_else(|| RepositoryError::NotFound(format!("meditation {id}")))?;

        row_to_meditation(&row)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<MeditationPage, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meditations WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);
        let rows = sqlx::query(&format!(
            "SELECT {MEDITATION_SELECT_COLUMNS} FROM meditations
             WHERE user_id = ?
             ORDER BY created_at DESC, rowid DESC
             LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        let meditations = rows
            .iter()
            .map(row_to_meditation)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MeditationPage {
            meditations,
            total: total.max(0) as u64,
            page,
            limit,
        })
    }
}
