use std::sync::Arc;
use tracing::{error, info};

use super::message::{ChatMessage, MessageSink, Sender};
use crate::audio::AudioSource;
use crate::capture::{CaptureConfig, CaptureSession};
use crate::client::AssistantBackend;
use crate::speech::SpeechSink;

const ASK_FAILED: &str = "Sorry, there was an error processing your request.";
const MIC_DENIED: &str = "Microphone access denied. Please allow microphone permissions.";
const RECORDING_STARTED: &str = "Recording... Speak now";
const PROCESSING_VOICE: &str = "Processing voice...";
const UNINTELLIGIBLE: &str = "Could not understand audio. Please try again.";
const VOICE_FAILED: &str = "Error processing voice input. Please try again.";
const VOICE_DISABLED: &str = "Voice input is disabled.";

/// Voice subsystem settings for the widget. Absent when the widget runs
/// in its text-only variant.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub source: AudioSource,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            source: AudioSource::Microphone,
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// The chat widget: message log, text send path, voice capture path and
/// speech output, composed over injected collaborators.
///
/// All waits are awaited inline on the caller's task, so the session slot
/// is the only concurrency guard needed: overlapping recording sessions
/// cannot happen, and a transcription in flight blocks the input loop
/// instead of dangling.
pub struct ChatWidget {
    backend: Arc<dyn AssistantBackend>,
    sink: Box<dyn MessageSink>,
    speech: Box<dyn SpeechSink>,
    capture: Option<CaptureSettings>,
    input: String,
    session: Option<CaptureSession>,
}

impl ChatWidget {
    pub fn new(
        backend: Arc<dyn AssistantBackend>,
        sink: Box<dyn MessageSink>,
        speech: Box<dyn SpeechSink>,
        capture: Option<CaptureSettings>,
    ) -> Self {
        Self {
            backend,
            sink,
            speech,
            capture,
            input: String::new(),
            session: None,
        }
    }

    /// Populate the input buffer (the widget's "input field")
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// Current content of the input buffer
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether a recording session is active
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Submit whatever is in the input buffer
    pub async fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        self.submit(&text).await;
    }

    /// Text send path: render the question, clear the input, ask the
    /// backend, render (and speak) the answer. Empty input is a no-op.
    pub async fn submit(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.log(text, Sender::User);
        self.input.clear();

        match self.backend.ask(text).await {
            Ok(answer) => {
                self.log(&answer, Sender::Bot);
                self.speech.speak(&answer);
            }
            Err(e) => {
                error!("Ask request failed: {:#}", e);
                self.log(ASK_FAILED, Sender::System);
            }
        }
    }

    /// Voice capture toggle: Idle starts a session, Recording stops it
    /// and hands the payload to transcription.
    pub async fn toggle_recording(&mut self) {
        match self.session.take() {
            None => self.start_recording().await,
            Some(session) => self.finish_recording(session).await,
        }
    }

    async fn start_recording(&mut self) {
        let Some(settings) = self.capture.clone() else {
            self.log(VOICE_DISABLED, Sender::System);
            return;
        };

        let config = CaptureConfig::new(settings.source, settings.sample_rate, settings.channels);
        let session = CaptureSession::new(config);

        match session.start().await {
            Ok(()) => {
                self.session = Some(session);
                self.log(RECORDING_STARTED, Sender::System);
            }
            Err(e) => {
                error!("Failed to start recording: {:#}", e);
                self.log(MIC_DENIED, Sender::System);
            }
        }
    }

    async fn finish_recording(&mut self, session: CaptureSession) {
        self.log(PROCESSING_VOICE, Sender::System);

        let payload = match session.stop().await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to stop recording: {:#}", e);
                self.log(VOICE_FAILED, Sender::System);
                return;
            }
        };

        let stats = session.stats();
        info!(
            "Recorded {:.1}s of audio ({} fragments, {} bytes)",
            stats.duration_secs,
            stats.fragments_count,
            payload.len()
        );

        self.transcribe_and_send(payload).await;
    }

    /// Transcription step: one attempt, outcome rendered either way. A
    /// usable transcript populates the input and auto-triggers the text
    /// send path.
    async fn transcribe_and_send(&mut self, payload: Vec<u8>) {
        let reply = match self.backend.transcribe(payload).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Transcription request failed: {:#}", e);
                self.log(VOICE_FAILED, Sender::System);
                return;
            }
        };

        let transcript = reply.text.unwrap_or_default();

        if !transcript.trim().is_empty() {
            self.log(&format!("Transcribed: \"{}\"", transcript), Sender::System);
            self.set_input(&transcript);
            self.submit_input().await;
        } else if let Some(error) = reply.error {
            self.log(&error, Sender::System);
        } else {
            self.log(UNINTELLIGIBLE, Sender::System);
        }
    }

    fn log(&mut self, text: &str, sender: Sender) {
        let message = ChatMessage::new(text, sender);
        self.sink.render(&message);
    }
}
