use serde::{Deserialize, Serialize};

use crate::audio::AudioSource;

/// Configuration for a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Unique session identifier (e.g., "capture-7f3c...")
    pub session_id: String,

    /// Audio source to record from
    #[serde(skip, default = "default_source")]
    pub source: AudioSource,

    /// Sample rate fragments are normalized to (speech-to-text expects 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

fn default_source() -> AudioSource {
    AudioSource::Microphone
}

impl CaptureConfig {
    pub fn new(source: AudioSource, sample_rate: u32, channels: u16) -> Self {
        Self {
            session_id: format!("capture-{}", uuid::Uuid::new_v4()),
            source,
            sample_rate,
            channels,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::new(AudioSource::Microphone, 16000, 1)
    }
}
