//! Meditation history handlers.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use calmwave_core::{Meditation, MeditationPage};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::HttpError;
use crate::extract::Caller;
use crate::state::AppState;

/// Paging parameters; defaults are applied by the history service.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List the caller's meditations, newest first.
/// GET /api/meditations?page=&limit=
pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<MeditationPage>, HttpError> {
    let Query(query) = query?;
    let page = state
        .history
        .list_for_user(&caller.user_id, query.page, query.limit)
        .await?;
    Ok(Json(page))
}

/// Get one of the caller's meditations.
/// GET /api/meditations/{id}
pub async fn get(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Meditation>, HttpError> {
    // Unparseable ids cannot exist, so they are simply not found.
    let id = Uuid::parse_str(&id).map_err(|_| HttpError::NotFound("Meditation not found".to_string()))?;
    let meditation = state.history.get_for_user(&caller.user_id, id).await?;
    Ok(Json(meditation))
}
