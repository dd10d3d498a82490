use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};

use interavoice::audio::AudioSource;
use interavoice::chat::{CaptureSettings, ChatWidget, ConsoleSink};
use interavoice::client::HttpAssistantClient;
use interavoice::http::{create_router, AppState};
use interavoice::intent::IntentEngine;
use interavoice::speech::{NullSpeech, SpeechOutput, SpeechSink};
use interavoice::store::FaqStore;
use interavoice::stt::SpeechToText;
use interavoice::Config;

#[derive(Parser)]
#[command(name = "interavoice", about = "Voice-enabled FAQ chat assistant")]
struct Cli {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/interavoice")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the answer backend (/ask, /speech-to-text)
    Serve,

    /// Run the interactive chat widget
    Chat {
        /// Disable the voice subsystem for this run
        #[arg(long)]
        text_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Chat { text_only } => chat(cfg, text_only).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let store = FaqStore::load(&cfg.faq.path)?;
    info!("Serving {} FAQ entries", store.len());

    let engine = IntentEngine::new(cfg.intent.threshold);

    let transcriber = match &cfg.stt {
        Some(stt) if !stt.api_key.is_empty() => Some(Arc::new(SpeechToText::new(
            &stt.api_url,
            &stt.api_key,
            &stt.model,
        )?)),
        _ => {
            warn!("No transcription API configured; /speech-to-text will report an error");
            None
        }
    };

    let state = AppState::new(Arc::new(store), Arc::new(engine), transcriber);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("{} listening on {}", cfg.service.name, addr);

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

async fn chat(cfg: Config, text_only: bool) -> Result<()> {
    let voice_enabled = cfg.voice.enabled && !text_only;

    let backend = Arc::new(HttpAssistantClient::new(&cfg.backend.base_url));

    let speech: Box<dyn SpeechSink> = if voice_enabled {
        match SpeechOutput::new(&cfg.voice.language) {
            Ok(speech) => Box::new(speech),
            Err(e) => {
                warn!("Speech output disabled: {:#}", e);
                Box::new(NullSpeech)
            }
        }
    } else {
        Box::new(NullSpeech)
    };

    let capture = voice_enabled.then(|| CaptureSettings {
        source: AudioSource::Microphone,
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
    });

    let mut widget = ChatWidget::new(backend, Box::new(ConsoleSink), speech, capture);

    println!("InteraVoice chat. Type a question and press Enter.");
    if voice_enabled {
        println!("Commands: /voice toggles recording, /quit exits.");
    } else {
        println!("Commands: /quit exits.");
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/voice" => widget.toggle_recording().await,
            text => {
                widget.set_input(text);
                widget.submit_input().await;
            }
        }
    }

    Ok(())
}
