use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One question/answer pair in the FAQ store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Loads and provides access to FAQ data from a JSON file.
pub struct FaqStore {
    path: PathBuf,
    entries: Vec<FaqEntry>,
}

impl FaqStore {
    /// Load the FAQ file. A missing file is replaced with a generated
    /// sample; an unreadable or malformed file degrades to an empty
    /// store with an error log.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Loading FAQ data from: {}", path.display());

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<FaqEntry>>(&contents) {
                Ok(entries) => {
                    info!("Loaded {} FAQ entries", entries.len());
                    entries
                }
                Err(e) => {
                    error!("Error parsing FAQ file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("FAQ file not found: {}", path.display());
                Self::create_sample(&path)?
            }
            Err(e) => {
                error!("Error reading FAQ file {}: {}", path.display(), e);
                Vec::new()
            }
        };

        Ok(Self { path, entries })
    }

    /// Write a sample FAQ file so a fresh checkout answers something.
    fn create_sample(path: &Path) -> Result<Vec<FaqEntry>> {
        let sample = vec![
            FaqEntry {
                question: "What is InteraVoice?".to_string(),
                answer: "InteraVoice is a voice-enabled assistant designed to help with customer support and FAQs.".to_string(),
            },
            FaqEntry {
                question: "How much does it cost?".to_string(),
                answer: "Please contact our sales team for pricing information.".to_string(),
            },
        ];

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&sample)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write sample FAQ file {}", path.display()))?;

        info!("Created sample FAQ file with {} entries", sample.len());
        Ok(sample)
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
