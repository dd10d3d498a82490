use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::backend::{AudioBackend, AudioFrame};

/// Microphone capture backend built on cpal.
///
/// The cpal stream is not Send, so the device is opened and owned by a
/// dedicated worker thread. Frames are forwarded over a bounded channel
/// at the device's native format; downstream consumers normalize them.
pub struct MicrophoneBackend {
    capturing: Arc<AtomicBool>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl MicrophoneBackend {
    pub fn new() -> Self {
        Self {
            capturing: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl Default for MicrophoneBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            anyhow::bail!("Microphone capture already started");
        }

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let capturing = Arc::clone(&self.capturing);
        capturing.store(true, Ordering::SeqCst);

        let worker = std::thread::spawn(move || {
            run_capture(frame_tx, capturing, ready_tx);
        });

        // The worker reports whether the input device could be opened.
        match ready_rx
            .recv_timeout(Duration::from_secs(5))
            .context("Audio capture thread did not report readiness")?
        {
            Ok(()) => {
                self.worker = Some(worker);
                info!("Microphone capture started");
                Ok(frame_rx)
            }
            Err(e) => {
                self.capturing.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(e)
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing.store(false, Ordering::SeqCst);

        if let Some(worker) = self.worker.take() {
            tokio::task::spawn_blocking(move || {
                if worker.join().is_err() {
                    error!("Microphone capture thread panicked");
                }
            })
            .await
            .context("Failed to join capture thread")?;
        }

        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Opens the default input device, forwards frames until the capturing
/// flag is cleared, then drops the stream (which releases the device and
/// closes the frame channel).
fn run_capture(
    frame_tx: mpsc::Sender<AudioFrame>,
    capturing: Arc<AtomicBool>,
    ready_tx: std::sync::mpsc::Sender<Result<()>>,
) {
    let host = cpal::default_host();

    let device = match host.default_input_device() {
        Some(device) => device,
        None => {
            let _ = ready_tx.send(Err(anyhow!("No input device available")));
            return;
        }
    };

    let supported = match device.default_input_config() {
        Ok(supported) => supported,
        Err(e) => {
            let _ = ready_tx.send(Err(anyhow!("Failed to query input config: {}", e)));
            return;
        }
    };

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.config();
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    info!(
        "Opening input device {} ({} Hz, {} channels)",
        device.name().unwrap_or_else(|_| "unknown".to_string()),
        sample_rate,
        channels
    );

    // Running sample counter, used to timestamp frames.
    let samples_seen = Arc::new(AtomicU64::new(0));

    let err_fn = |err| {
        error!("Audio capture stream error: {}", err);
    };

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            let samples_seen = Arc::clone(&samples_seen);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<i16> = data
                        .iter()
                        .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
                        .collect();
                    forward_frame(&frame_tx, &samples_seen, samples, sample_rate, channels);
                },
                err_fn,
                None,
            )
        }
        cpal::SampleFormat::I16 => {
            let samples_seen = Arc::clone(&samples_seen);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    forward_frame(&frame_tx, &samples_seen, data.to_vec(), sample_rate, channels);
                },
                err_fn,
                None,
            )
        }
        other => {
            let _ = ready_tx.send(Err(anyhow!("Unsupported sample format: {:?}", other)));
            return;
        }
    };

    let stream = match stream {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(anyhow!("Failed to open input stream: {}", e)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(anyhow!("Failed to start input stream: {}", e)));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    while capturing.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(50));
    }

    // Dropping the stream releases the device and the frame sender.
    drop(stream);
}

fn forward_frame(
    frame_tx: &mpsc::Sender<AudioFrame>,
    samples_seen: &AtomicU64,
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
) {
    let seen = samples_seen.fetch_add(samples.len() as u64, Ordering::SeqCst);
    let timestamp_ms = seen / u64::from(channels) * 1000 / u64::from(sample_rate);

    let frame = AudioFrame {
        samples,
        sample_rate,
        channels,
        timestamp_ms,
    };

    // try_send keeps the device callback non-blocking; a full channel
    // means the consumer stopped draining, so the frame is dropped.
    let _ = frame_tx.try_send(frame);
}
