use serde::{Deserialize, Serialize};

/// Who authored a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

/// A single line in the message log. Ephemeral: it exists only as a
/// rendered entry in the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }
}

/// Render target for the message log. Injected into the widget so the
/// terminal frontend and test doubles can both observe the log.
pub trait MessageSink {
    fn render(&mut self, message: &ChatMessage);
}

/// Message sink that prints to stdout
pub struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn render(&mut self, message: &ChatMessage) {
        match message.sender {
            Sender::User => println!("you> {}", message.text),
            Sender::Bot => println!("bot> {}", message.text),
            Sender::System => println!("[interavoice] {}", message.text),
        }
    }
}
