pub mod backend;
pub mod file;
pub mod microphone;
pub mod wav;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use file::{AudioFile, FileBackend};
pub use microphone::MicrophoneBackend;
pub use wav::frames_to_wav;
