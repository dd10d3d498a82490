//! HTTP API server for the answer backend
//!
//! This module provides the endpoints the chat widget consumes:
//! - POST /ask - Answer a question from the FAQ store
//! - POST /speech-to-text - Transcribe an uploaded recording
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
