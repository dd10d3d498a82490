use super::config::CaptureConfig;
use super::stats::CaptureStats;
use crate::audio::{self, AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A capture session that owns one recording: the audio backend, the
/// buffered fragments, and the recording flag.
///
/// Constructed on start and consumed by stop; at most one session should
/// be active at a time (the widget enforces this through its session slot).
pub struct CaptureSession {
    /// Session configuration
    config: CaptureConfig,

    /// When the session started
    started_at: chrono::DateTime<chrono::Utc>,

    /// Whether recording is currently active
    is_recording: Arc<AtomicBool>,

    /// Buffered audio fragments, in arrival order
    fragments: Arc<Mutex<Vec<AudioFrame>>>,

    /// Number of fragments buffered
    fragments_count: Arc<AtomicUsize>,

    /// The running audio backend; released on stop
    backend: Arc<Mutex<Option<Box<dyn AudioBackend>>>>,

    /// Handle for the fragment draining task
    drain_task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl CaptureSession {
    /// Create a new capture session
    pub fn new(config: CaptureConfig) -> Self {
        info!("Creating capture session: {}", config.session_id);

        Self {
            config,
            started_at: Utc::now(),
            is_recording: Arc::new(AtomicBool::new(false)),
            fragments: Arc::new(Mutex::new(Vec::new())),
            fragments_count: Arc::new(AtomicUsize::new(0)),
            backend: Arc::new(Mutex::new(None)),
            drain_task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start recording
    pub async fn start(&self) -> Result<()> {
        if self.is_recording.load(Ordering::SeqCst) {
            warn!("Recording already started");
            return Ok(());
        }

        info!("Starting capture session: {}", self.config.session_id);

        let backend_config = AudioBackendConfig {
            target_sample_rate: self.config.sample_rate,
            target_channels: self.config.channels,
            buffer_duration_ms: 100, // 100ms latency
        };

        let mut audio_backend =
            AudioBackendFactory::create(&self.config.source, backend_config)
                .context("Failed to create audio backend")?;

        // Start capturing audio
        let mut audio_rx = audio_backend
            .start()
            .await
            .context("Failed to start audio capture")?;

        let backend_name = audio_backend.name().to_string();

        self.is_recording.store(true, Ordering::SeqCst);

        {
            let mut backend = self.backend.lock().await;
            *backend = Some(audio_backend);
        }

        // Spawn fragment draining task. It runs until the backend is
        // stopped and the frame channel closes, so no buffered frame is
        // lost on the way out.
        let fragments = Arc::clone(&self.fragments);
        let fragments_count = Arc::clone(&self.fragments_count);
        let sample_rate = self.config.sample_rate;
        let channels = self.config.channels;

        let drain_task = tokio::spawn(async move {
            info!("Fragment draining task started");

            while let Some(frame) = audio_rx.recv().await {
                // Normalize frame to the target format
                let processed = Self::process_frame(frame, sample_rate, channels);

                fragments_count.fetch_add(1, Ordering::SeqCst);

                let mut buffer = fragments.lock().await;
                buffer.push(processed);
            }

            info!("Fragment draining task stopped");
        });

        {
            let mut handle = self.drain_task_handle.lock().await;
            *handle = Some(drain_task);
        }

        info!(
            "Capture session {} started ({})",
            self.config.session_id, backend_name
        );

        Ok(())
    }

    /// Stop recording and assemble the buffered fragments into a single
    /// WAV payload. This is the terminal action of every session.
    pub async fn stop(&self) -> Result<Vec<u8>> {
        if !self.is_recording.swap(false, Ordering::SeqCst) {
            anyhow::bail!("Capture session is not recording");
        }

        info!("Stopping capture session: {}", self.config.session_id);

        // Release the input device; this closes the frame channel and
        // lets the draining task finish.
        {
            let mut backend = self.backend.lock().await;
            if let Some(mut audio_backend) = backend.take() {
                if let Err(e) = audio_backend.stop().await {
                    error!("Failed to stop audio backend: {}", e);
                }
            }
        }

        // Wait for the draining task to consume the remaining frames
        {
            let mut handle = self.drain_task_handle.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Fragment draining task panicked: {}", e);
                }
            }
        }

        let fragments = {
            let mut buffer = self.fragments.lock().await;
            std::mem::take(&mut *buffer)
        };

        info!(
            "Capture session {} stopped: {} fragments",
            self.config.session_id,
            fragments.len()
        );

        audio::frames_to_wav(&fragments, self.config.sample_rate, self.config.channels)
    }

    /// Get current session statistics
    pub fn stats(&self) -> CaptureStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        CaptureStats {
            is_recording: self.is_recording.load(Ordering::SeqCst),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            fragments_count: self.fragments_count.load(Ordering::SeqCst),
        }
    }

    /// Whether the session is currently recording
    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Normalize an audio frame to the target format
    fn process_frame(frame: AudioFrame, target_sample_rate: u32, target_channels: u16) -> AudioFrame {
        let mut processed = frame;

        // Convert to mono first so decimation operates on whole frames
        if processed.channels != target_channels && target_channels == 1 {
            processed = Self::stereo_to_mono(processed);
        }

        // Downsample if needed
        if processed.sample_rate != target_sample_rate {
            processed = Self::downsample_frame(processed, target_sample_rate);
        }

        processed
    }

    /// Downsample audio frame by decimation
    fn downsample_frame(frame: AudioFrame, target_rate: u32) -> AudioFrame {
        if frame.sample_rate == target_rate {
            return frame;
        }

        let ratio = frame.sample_rate / target_rate;
        if ratio <= 1 {
            return frame; // Can't upsample
        }

        // Decimate: take every Nth sample
        let downsampled: Vec<i16> = frame
            .samples
            .iter()
            .step_by(ratio as usize)
            .copied()
            .collect();

        AudioFrame {
            samples: downsampled,
            sample_rate: target_rate,
            channels: frame.channels,
            timestamp_ms: frame.timestamp_ms,
        }
    }

    /// Convert stereo to mono by summing channels
    fn stereo_to_mono(frame: AudioFrame) -> AudioFrame {
        if frame.channels == 1 {
            return frame;
        }

        if frame.channels != 2 {
            return frame; // Only support stereo -> mono
        }

        let mut mono_samples = Vec::with_capacity(frame.samples.len() / 2);

        // Sum left and right channels (no division to preserve volume)
        for chunk in frame.samples.chunks_exact(2) {
            let left = chunk[0] as i32;
            let right = chunk[1] as i32;
            let sum = left + right;
            let mono = sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            mono_samples.push(mono);
        }

        AudioFrame {
            samples: mono_samples,
            sample_rate: frame.sample_rate,
            channels: 1,
            timestamp_ms: frame.timestamp_ms,
        }
    }
}
