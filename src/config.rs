use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub backend: BackendConfig,
    pub audio: AudioConfig,
    pub voice: VoiceConfig,
    pub intent: IntentConfig,
    pub faq: FaqConfig,
    pub stt: Option<SttConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Endpoints the chat widget talks to.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Voice subsystem of the chat widget (microphone capture + spoken replies).
#[derive(Debug, Deserialize)]
pub struct VoiceConfig {
    pub enabled: bool,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct IntentConfig {
    pub threshold: f64,
}

#[derive(Debug, Deserialize)]
pub struct FaqConfig {
    pub path: String,
}

/// Upstream transcription API used by the /speech-to-text handler.
/// An empty api_key leaves transcription unconfigured.
#[derive(Debug, Deserialize)]
pub struct SttConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
