use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for audio backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Target sample rate (frames are normalized downstream if needed)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz for speech-to-text
            target_channels: 1,        // Mono
            buffer_duration_ms: 100,   // 100ms buffers
        }
    }
}

/// Audio capture backend trait
///
/// Implementations:
/// - Microphone: cpal default input device (all platforms)
/// - File: read from a WAV file (for testing/batch processing)
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. The
    /// channel closes once the backend has been stopped and the device
    /// released.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio and release the input device
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Microphone input (all platforms)
    Microphone,
    /// File input (for testing/batch processing)
    File(PathBuf),
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create audio backend for the given source
    pub fn create(
        source: &AudioSource,
        config: AudioBackendConfig,
    ) -> Result<Box<dyn AudioBackend>> {
        match source {
            AudioSource::Microphone => {
                use super::microphone::MicrophoneBackend;
                Ok(Box::new(MicrophoneBackend::new()))
            }

            AudioSource::File(path) => {
                use super::file::FileBackend;
                Ok(Box::new(FileBackend::new(path.clone(), config)))
            }
        }
    }
}
