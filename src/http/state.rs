use std::sync::Arc;

use crate::intent::IntentEngine;
use crate::store::FaqStore;
use crate::stt::SpeechToText;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// FAQ entries served by /ask
    pub store: Arc<FaqStore>,

    /// Intent matcher for /ask
    pub engine: Arc<IntentEngine>,

    /// Upstream transcription client; None when unconfigured
    pub transcriber: Option<Arc<SpeechToText>>,
}

impl AppState {
    pub fn new(
        store: Arc<FaqStore>,
        engine: Arc<IntentEngine>,
        transcriber: Option<Arc<SpeechToText>>,
    ) -> Self {
        Self {
            store,
            engine,
            transcriber,
        }
    }
}
