use anyhow::{Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};

pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path)
            .context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds = samples.len() as f64 /
            (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// File-based capture backend: streams a WAV file as audio frames.
///
/// Used for tests and batch processing where no input device exists.
pub struct FileBackend {
    path: PathBuf,
    config: AudioBackendConfig,
    capturing: Arc<AtomicBool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl FileBackend {
    pub fn new(path: PathBuf, config: AudioBackendConfig) -> Self {
        Self {
            path,
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            anyhow::bail!("File capture already started");
        }

        let audio = AudioFile::open(&self.path)?;
        let (frame_tx, frame_rx) = mpsc::channel(64);

        let capturing = Arc::clone(&self.capturing);
        capturing.store(true, Ordering::SeqCst);

        let frame_duration_ms = self.config.buffer_duration_ms.max(1);

        let task = tokio::spawn(async move {
            let sample_rate = audio.sample_rate;
            let channels = audio.channels;
            let samples_per_frame = (sample_rate as u64 * frame_duration_ms / 1000) as usize
                * channels as usize;
            let samples_per_frame = samples_per_frame.max(1);

            for (index, chunk) in audio.samples.chunks(samples_per_frame).enumerate() {
                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms: index as u64 * frame_duration_ms,
                };

                if frame_tx.send(frame).await.is_err() {
                    break;
                }
            }

            capturing.store(false, Ordering::SeqCst);
        });

        self.task = Some(task);
        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
