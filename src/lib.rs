pub mod audio;
pub mod capture;
pub mod chat;
pub mod client;
pub mod config;
pub mod http;
pub mod intent;
pub mod speech;
pub mod store;
pub mod stt;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFile, AudioFrame, AudioSource,
    FileBackend, MicrophoneBackend,
};
pub use capture::{CaptureConfig, CaptureSession, CaptureStats};
pub use chat::{CaptureSettings, ChatMessage, ChatWidget, ConsoleSink, MessageSink, Sender};
pub use client::{AssistantBackend, HttpAssistantClient, TranscriptReply};
pub use config::Config;
pub use http::{create_router, AppState};
pub use intent::IntentEngine;
pub use speech::{NullSpeech, SpeechOutput, SpeechSink};
pub use store::{FaqEntry, FaqStore};
pub use stt::SpeechToText;
