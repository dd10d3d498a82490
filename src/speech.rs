use anyhow::{anyhow, Result};
use tracing::{info, warn};
use tts::{Gender, Tts};

/// Speech output target, fed with every bot reply.
pub trait SpeechSink {
    /// Speak the given text aloud, canceling any in-progress utterance.
    /// Best-effort: failures are logged, never surfaced.
    fn speak(&mut self, text: &str);
}

/// Speech sink that stays silent. Used when the voice subsystem is
/// disabled or the platform lacks speech synthesis support.
pub struct NullSpeech;

impl SpeechSink for NullSpeech {
    fn speak(&mut self, _text: &str) {}
}

/// A platform voice reduced to the attributes the selection policy needs.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceProfile {
    pub name: String,
    pub language: String,
    pub female: bool,
}

/// Voice selection policy: prefer a female voice matching the language
/// prefix, else the first voice matching the language, else none (the
/// platform default stays in effect).
///
/// This is a soft preference; voice metadata is not a stable platform
/// contract.
pub fn pick_voice(voices: &[VoiceProfile], language: &str) -> Option<usize> {
    voices
        .iter()
        .position(|v| v.language.starts_with(language) && v.female)
        .or_else(|| voices.iter().position(|v| v.language.starts_with(language)))
}

/// Speech output through the platform synthesizer.
pub struct SpeechOutput {
    tts: Tts,
}

impl SpeechOutput {
    /// Initialize the platform synthesizer: fixed maximum volume, rate
    /// slightly below normal, neutral pitch, and a best-effort voice
    /// choice for the given language.
    ///
    /// Errors when the platform has no speech synthesis support; callers
    /// fall back to `NullSpeech`.
    pub fn new(language: &str) -> Result<Self> {
        let mut tts =
            Tts::default().map_err(|e| anyhow!("Platform speech synthesis unavailable: {}", e))?;

        if let Err(e) = tts.set_volume(tts.max_volume()) {
            warn!("Failed to set speech volume: {}", e);
        }

        let rate = tts.normal_rate() - 0.1 * (tts.normal_rate() - tts.min_rate());
        if let Err(e) = tts.set_rate(rate) {
            warn!("Failed to set speech rate: {}", e);
        }

        if let Err(e) = tts.set_pitch(tts.normal_pitch()) {
            warn!("Failed to set speech pitch: {}", e);
        }

        // The platform voice list may still be empty at construction
        // time; in that case the default voice stays selected.
        match tts.voices() {
            Ok(voices) => {
                let profiles: Vec<VoiceProfile> = voices
                    .iter()
                    .map(|v| VoiceProfile {
                        name: v.name(),
                        language: v.language().as_str().to_string(),
                        female: matches!(v.gender(), Some(Gender::Female))
                            || v.name().contains("Female"),
                    })
                    .collect();

                if let Some(index) = pick_voice(&profiles, language) {
                    info!("Selected voice: {}", profiles[index].name);
                    if let Err(e) = tts.set_voice(&voices[index]) {
                        warn!("Failed to select voice: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("Platform voice list unavailable: {}", e);
            }
        }

        Ok(Self { tts })
    }
}

impl SpeechSink for SpeechOutput {
    fn speak(&mut self, text: &str) {
        // interrupt = true cancels any in-progress utterance, so at most
        // one utterance is audible at a time.
        if let Err(e) = self.tts.speak(text, true) {
            warn!("Speech synthesis failed: {}", e);
        }
    }
}
