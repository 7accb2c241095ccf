//! Meditation generation endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use calmwave_core::{GenerationInput, GenerationRequest};
use tracing::info;

use crate::error::HttpError;
use crate::extract::{Caller, PersonalKey};
use crate::state::AppState;
use crate::stream::progress_response;

/// Start a generation and stream its progress.
/// POST /api/generate-meditation
///
/// Identity, credential and body problems are answered with a plain error
/// status. Anything after acceptance is reported inside the stream.
pub async fn generate(
    State(state): State<AppState>,
    caller: Caller,
    PersonalKey(personal_key): PersonalKey,
    payload: Result<Json<GenerationInput>, JsonRejection>,
) -> Result<Response, HttpError> {
    if personal_key.is_none() && !state.shared_key_configured {
        return Err(HttpError::Unauthorized(
            "No OpenAI API key available. Add your key in settings.".to_string(),
        ));
    }

    let Json(input) = payload?;
    let request = GenerationRequest::accept(
        caller.user_id,
        input,
        personal_key,
        state.pipeline.config(),
    )?;

    info!(
        user_id = request.owner(),
        duration_minutes = request.duration_minutes(),
        music_volume = request.music_volume(),
        personal_key = request.credential().is_some(),
        "Generation accepted"
    );

    Ok(progress_response(state.pipeline.start(request)))
}
