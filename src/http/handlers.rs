use super::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const EMPTY_QUESTION_ANSWER: &str = "Please type a question first.";
const NO_MATCH_ANSWER: &str = "I'm sorry, I don't have an answer for that yet.";
const STT_UNCONFIGURED: &str = "Speech recognition is not configured on this server.";
const STT_FAILED: &str = "Could not transcribe audio.";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The user's question
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /ask
/// Answer a question from the FAQ store
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    let question = req.question.unwrap_or_default();
    let question = question.trim();

    if question.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AskResponse {
                answer: EMPTY_QUESTION_ANSWER.to_string(),
            }),
        )
            .into_response();
    }

    info!("Answering question: {}", question);

    let answer = match state.engine.best_match(question, state.store.entries()) {
        Some(entry) => entry.answer.clone(),
        None => NO_MATCH_ANSWER.to_string(),
    };

    (StatusCode::OK, Json(AskResponse { answer })).into_response()
}

/// POST /speech-to-text
/// Transcribe an uploaded audio recording
pub async fn speech_to_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut audio: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("audio") {
                    match field.bytes().await {
                        Ok(bytes) => {
                            audio = Some(bytes.to_vec());
                            break;
                        }
                        Err(e) => {
                            error!("Failed to read audio field: {}", e);
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(ErrorResponse {
                                    error: format!("Invalid audio upload: {}", e),
                                }),
                            )
                                .into_response();
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Malformed multipart body: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed upload: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    }

    let Some(audio) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing audio field".to_string(),
            }),
        )
            .into_response();
    };

    info!("Received audio upload: {} bytes", audio.len());

    let Some(transcriber) = &state.transcriber else {
        return (
            StatusCode::OK,
            Json(ErrorResponse {
                error: STT_UNCONFIGURED.to_string(),
            }),
        )
            .into_response();
    };

    match transcriber.transcribe(audio).await {
        Ok(text) => (StatusCode::OK, Json(TranscriptResponse { text })).into_response(),
        Err(e) => {
            error!("Transcription failed: {:#}", e);
            (
                StatusCode::OK,
                Json(ErrorResponse {
                    error: STT_FAILED.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
