//! Capture session management
//!
//! This module provides the `CaptureSession` abstraction that manages:
//! - Audio capture from the microphone (or a file, in tests)
//! - Audio processing (downsampling, mono conversion)
//! - Fragment buffering and WAV payload assembly
//! - Session statistics and state management

mod config;
mod session;
mod stats;

pub use config::CaptureConfig;
pub use session::CaptureSession;
pub use stats::CaptureStats;
