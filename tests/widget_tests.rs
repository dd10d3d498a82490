// Tests for the chat widget: message log ordering, the text send path,
// and the voice capture/transcription flow over injected doubles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use interavoice::audio::AudioSource;
use interavoice::chat::{CaptureSettings, ChatMessage, ChatWidget, MessageSink, Sender};
use interavoice::client::{AssistantBackend, TranscriptReply};
use interavoice::speech::SpeechSink;
use tempfile::TempDir;

/// Everything observable about a widget run, in order.
#[derive(Debug, Clone, PartialEq)]
enum Event {
    Rendered(Sender, String),
    Asked(String),
    TranscribeRequested,
}

#[derive(Clone)]
struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn ask_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Asked(_)))
            .count()
    }
}

struct RecordingSink(EventLog);

impl MessageSink for RecordingSink {
    fn render(&mut self, message: &ChatMessage) {
        self.0
            .push(Event::Rendered(message.sender, message.text.clone()));
    }
}

struct RecordingSpeech(Arc<Mutex<Vec<String>>>);

impl SpeechSink for RecordingSpeech {
    fn speak(&mut self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

/// Backend double with canned responses. `None` simulates a transport
/// failure.
struct ScriptedBackend {
    log: EventLog,
    answer: Option<String>,
    transcript: Option<TranscriptReply>,
}

#[async_trait::async_trait]
impl AssistantBackend for ScriptedBackend {
    async fn ask(&self, question: &str) -> Result<String> {
        self.log.push(Event::Asked(question.to_string()));
        self.answer
            .clone()
            .ok_or_else(|| anyhow::anyhow!("network unreachable"))
    }

    async fn transcribe(&self, _wav: Vec<u8>) -> Result<TranscriptReply> {
        self.log.push(Event::TranscribeRequested);
        self.transcript
            .clone()
            .ok_or_else(|| anyhow::anyhow!("network unreachable"))
    }
}

fn build_widget(
    log: &EventLog,
    spoken: &Arc<Mutex<Vec<String>>>,
    answer: Option<&str>,
    transcript: Option<TranscriptReply>,
    capture: Option<CaptureSettings>,
) -> ChatWidget {
    let backend = Arc::new(ScriptedBackend {
        log: log.clone(),
        answer: answer.map(str::to_string),
        transcript,
    });

    ChatWidget::new(
        backend,
        Box::new(RecordingSink(log.clone())),
        Box::new(RecordingSpeech(Arc::clone(spoken))),
        capture,
    )
}

/// Write a short 16kHz mono WAV and return capture settings reading it.
fn file_capture(dir: &TempDir) -> CaptureSettings {
    let path: PathBuf = dir.path().join("input.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..1600i16 {
        writer.write_sample(i).unwrap();
    }
    writer.finalize().unwrap();

    CaptureSettings {
        source: AudioSource::File(path),
        sample_rate: 16000,
        channels: 1,
    }
}

#[tokio::test]
async fn test_submit_renders_user_message_before_network_call() {
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, Some("Paris"), None, None);

    widget.submit("What is the capital of France?").await;

    let events = log.events();
    assert_eq!(
        events,
        vec![
            Event::Rendered(Sender::User, "What is the capital of France?".to_string()),
            Event::Asked("What is the capital of France?".to_string()),
            Event::Rendered(Sender::Bot, "Paris".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_input_is_a_no_op() {
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, Some("Paris"), None, None);

    widget.submit("").await;
    widget.submit("   \t  ").await;

    widget.set_input("   ");
    widget.submit_input().await;

    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_bot_reply_is_spoken() {
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, Some("Paris"), None, None);

    widget.submit("What is the capital of France?").await;

    assert_eq!(*spoken.lock().unwrap(), vec!["Paris".to_string()]);
}

#[tokio::test]
async fn test_ask_failure_renders_error_message() {
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, None, None, None);

    widget.submit("hello").await;

    let events = log.events();
    assert_eq!(
        events.last(),
        Some(&Event::Rendered(
            Sender::System,
            "Sorry, there was an error processing your request.".to_string()
        ))
    );
    assert!(spoken.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_clears_input() {
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, Some("answer"), None, None);

    widget.set_input("a question");
    widget.submit_input().await;

    assert_eq!(widget.input(), "");
}

#[tokio::test]
async fn test_transcript_populates_input_and_auto_sends() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let reply = TranscriptReply {
        text: Some("hello".to_string()),
        error: None,
    };
    let mut widget = build_widget(
        &log,
        &spoken,
        Some("hi there"),
        Some(reply),
        Some(file_capture(&dir)),
    );

    widget.toggle_recording().await;
    assert!(widget.is_recording());
    widget.toggle_recording().await;

    let events = log.events();
    let confirmation = Event::Rendered(Sender::System, "Transcribed: \"hello\"".to_string());
    let auto_sent = Event::Rendered(Sender::User, "hello".to_string());

    let confirmation_at = events.iter().position(|e| *e == confirmation).unwrap();
    let auto_sent_at = events.iter().position(|e| *e == auto_sent).unwrap();

    assert!(confirmation_at < auto_sent_at);
    assert!(events.contains(&Event::Asked("hello".to_string())));
    assert_eq!(widget.input(), "");
}

#[tokio::test]
async fn test_empty_transcript_renders_fixed_message_without_sending() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let reply = TranscriptReply {
        text: Some(String::new()),
        error: None,
    };
    let mut widget = build_widget(&log, &spoken, Some("hi"), Some(reply), Some(file_capture(&dir)));

    widget.toggle_recording().await;
    widget.toggle_recording().await;

    let events = log.events();
    assert!(events.contains(&Event::Rendered(
        Sender::System,
        "Could not understand audio. Please try again.".to_string()
    )));
    assert_eq!(log.ask_count(), 0);
}

#[tokio::test]
async fn test_transcript_error_is_rendered_without_sending() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let reply = TranscriptReply {
        text: None,
        error: Some("bad audio".to_string()),
    };
    let mut widget = build_widget(&log, &spoken, Some("hi"), Some(reply), Some(file_capture(&dir)));

    widget.toggle_recording().await;
    widget.toggle_recording().await;

    let events = log.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::Rendered(Sender::System, text) if text.contains("bad audio"))));
    assert_eq!(log.ask_count(), 0);
}

#[tokio::test]
async fn test_transcription_transport_failure_renders_fallback() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, Some("hi"), None, Some(file_capture(&dir)));

    widget.toggle_recording().await;
    widget.toggle_recording().await;

    let events = log.events();
    assert!(events.contains(&Event::Rendered(
        Sender::System,
        "Error processing voice input. Please try again.".to_string()
    )));
    assert_eq!(log.ask_count(), 0);
}

#[tokio::test]
async fn test_toggle_twice_returns_to_a_startable_state() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let reply = TranscriptReply::default();
    let mut widget = build_widget(&log, &spoken, Some("hi"), Some(reply), Some(file_capture(&dir)));

    widget.toggle_recording().await;
    widget.toggle_recording().await;
    assert!(!widget.is_recording());

    // A subsequent start must be accepted
    widget.toggle_recording().await;
    assert!(widget.is_recording());
    widget.toggle_recording().await;
    assert!(!widget.is_recording());
}

#[tokio::test]
async fn test_toggle_without_voice_subsystem_renders_disabled_message() {
    let log = EventLog::new();
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mut widget = build_widget(&log, &spoken, Some("hi"), None, None);

    widget.toggle_recording().await;

    assert!(!widget.is_recording());
    assert_eq!(
        log.events(),
        vec![Event::Rendered(
            Sender::System,
            "Voice input is disabled.".to_string()
        )]
    );
}
