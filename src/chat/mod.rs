//! The chat widget
//!
//! This module composes the four widget responsibilities over injected
//! collaborators:
//! - Message log (`MessageSink`)
//! - Text send path (`ChatWidget::submit`)
//! - Voice capture path (`ChatWidget::toggle_recording`)
//! - Speech output (`SpeechSink`, fed after every bot reply)

mod message;
mod widget;

pub use message::{ChatMessage, ConsoleSink, MessageSink, Sender};
pub use widget::{CaptureSettings, ChatWidget};
