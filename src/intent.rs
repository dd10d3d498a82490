use tracing::{debug, info};

use crate::store::FaqEntry;

/// Simple intent matching engine: uses string similarity to find the
/// closest matching FAQ.
pub struct IntentEngine {
    threshold: f64,
}

impl IntentEngine {
    pub fn new(threshold: f64) -> Self {
        info!("Intent engine initialized with threshold {:.2}", threshold);
        Self { threshold }
    }

    /// Find the FAQ entry closest to the user's text, or None when the
    /// best score stays below the threshold.
    pub fn best_match<'a>(&self, user_text: &str, faqs: &'a [FaqEntry]) -> Option<&'a FaqEntry> {
        let mut best: Option<&FaqEntry> = None;
        let mut best_score = 0.0;

        for entry in faqs {
            let score = similarity(user_text, &entry.question);
            debug!("Compared with '{}' | score {:.2}", entry.question, score);

            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        if best_score >= self.threshold {
            if let Some(entry) = best {
                info!("Match found: '{}' (score {:.2})", entry.question, best_score);
            }
            best
        } else {
            info!("No suitable match found for '{}'", user_text);
            None
        }
    }
}

/// Case-insensitive string similarity in [0.0, 1.0]: twice the number of
/// matched characters over the combined length (Ratcliff/Obershelp).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Total characters covered by recursively matching the longest common
/// substring and recursing into the pieces on either side of it.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Longest common substring via a rolling DP row
    let mut best_len = 0;
    let mut best_a = 0;
    let mut best_b = 0;
    let mut row = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut prev = 0;
        for (j, &cb) in b.iter().enumerate() {
            let current = row[j + 1];
            row[j + 1] = if ca == cb { prev + 1 } else { 0 };
            if row[j + 1] > best_len {
                best_len = row[j + 1];
                best_a = i + 1 - best_len;
                best_b = j + 1 - best_len;
            }
            prev = current;
        }
    }

    if best_len == 0 {
        return 0;
    }

    best_len
        + matched_chars(&a[..best_a], &b[..best_b])
        + matched_chars(&a[best_a + best_len..], &b[best_b + best_len..])
}
