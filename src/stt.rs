use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

/// Response from a Whisper-style transcription API
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Forwards recorded audio to an upstream Whisper-style transcription
/// API. Used by the /speech-to-text handler; when no API key is
/// configured the handler reports transcription as unavailable instead.
pub struct SpeechToText {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl SpeechToText {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("Transcription API key required");
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Transcribe WAV audio bytes to text. One attempt, no retries.
    pub async fn transcribe(&self, audio: Vec<u8>) -> Result<String> {
        info!("Forwarding {} bytes of audio for transcription", audio.len());

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .context("Invalid audio MIME type")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach the transcription API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Transcription API error {}: {}", status, body);
            anyhow::bail!("Transcription API error {}", status);
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription API response")?;

        info!("Transcription complete ({} chars)", result.text.len());
        Ok(result.text)
    }
}
