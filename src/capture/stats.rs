use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Whether recording is currently active
    pub is_recording: bool,

    /// When the recording started
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Number of audio fragments buffered so far
    pub fragments_count: usize,
}
