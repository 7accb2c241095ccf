//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// API routes without the `/api` prefix.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-meditation", post(handlers::generate::generate))
        .route("/meditations", get(handlers::meditations::list))
        .route("/meditations/{id}", get(handlers::meditations::get))
}

/// Build the full application router.
///
/// Finished audio is served from the pipeline's audio directory under its
/// public prefix, so stored `audioFilePath` values resolve directly.
pub fn create_router(ctx: AxumContext, cors: &CorsConfig) -> Router {
    let config = ctx.pipeline.config();
    let audio_dir = config.audio_dir.clone();
    let audio_prefix = config.public_prefix.clone();
    let state: AppState = Arc::new(ctx);

    Router::new()
        .nest("/api", api_routes().with_state(state))
        .nest_service(&audio_prefix, ServeDir::new(audio_dir))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors))
}
