use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Maximum accepted audio upload (matches common transcription API limits)
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Question answering
        .route("/ask", post(handlers::ask))
        // Voice transcription
        .route("/speech-to-text", post(handlers::speech_to_text))
        // Recordings are larger than the default body limit
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
