use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request body for the /ask endpoint
#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Response body from the /ask endpoint
#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

/// Response body from the /speech-to-text endpoint.
///
/// A successful transcription carries `text`; the backend signals
/// semantic failures through `error`; a body with neither is treated
/// as unusable by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptReply {
    pub text: Option<String>,
    pub error: Option<String>,
}

/// The two HTTP contracts the chat widget consumes.
#[async_trait::async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Submit a question and return the answer text
    async fn ask(&self, question: &str) -> Result<String>;

    /// Submit a recorded WAV payload for transcription
    async fn transcribe(&self, wav: Vec<u8>) -> Result<TranscriptReply>;
}

/// HTTP client for the answer backend
pub struct HttpAssistantClient {
    client: Client,
    base_url: String,
}

impl HttpAssistantClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl AssistantBackend for HttpAssistantClient {
    async fn ask(&self, question: &str) -> Result<String> {
        let url = format!("{}/ask", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await
            .context("Failed to reach the answer backend")?;

        // Soft failures (e.g. an empty question rejected with 400) still
        // carry an answer body the widget can render, so the status code
        // is not checked here.
        let reply: AskResponse = response
            .json()
            .await
            .context("Failed to parse answer response")?;

        Ok(reply.answer)
    }

    async fn transcribe(&self, wav: Vec<u8>) -> Result<TranscriptReply> {
        let url = format!("{}/speech-to-text", self.base_url);

        info!("Uploading {} bytes of audio for transcription", wav.len());

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .context("Invalid audio MIME type")?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach the transcription backend")?;

        let reply: TranscriptReply = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        Ok(reply)
    }
}
