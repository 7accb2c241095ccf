//! Row mapping helpers for `SQLite` queries.

use calmwave_core::{Meditation, RepositoryError, Script};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Shared SELECT column list for meditation queries.
pub const MEDITATION_SELECT_COLUMNS: &str =
    "id, user_id, user_input, meditation_script, audio_file_path, created_at, updated_at";

/// Fixed-width RFC 3339 so lexical order matches time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Serialization(format!("{column}: {e}")))
}

fn storage(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

/// Parse a database row into a [`Meditation`].
pub fn row_to_meditation(row: &sqlx::sqlite::SqliteRow) -> Result<Meditation, RepositoryError> {
    let id: String = row.try_get("id").map_err(storage)?;
    let script_json: String = row.try_get("meditation_script").map_err(storage)?;
    let created_at: String = row.try_get("created_at").map_err(storage)?;
    let updated_at: String = row.try_get("updated_at").map_err(storage)?;

    let meditation_script: Script = serde_json::from_str(&script_json)
        .map_err(|e| RepositoryError::Serialization(format!("meditation_script: {e}")))?;

    Ok(Meditation {
        id: Uuid::parse_str(&id).map_err(|e| RepositoryError::Serialization(format!("id: {e}")))?,
        user_id: row.try_get("user_id").map_err(storage)?,
        user_input: row.try_get("user_input").map_err(storage)?,
        meditation_script,
        audio_file_path: row.try_get("audio_file_path").map_err(storage)?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}
