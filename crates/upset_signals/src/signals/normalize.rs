/// Canonical matching form: trimmed, lowercased, whitespace runs collapsed
/// to a single space.
///
/// Apostrophes are left alone, so phrase lists carry both the curly and the
/// straight spelling.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Message text paired with its normalized form
#[derive(Debug, Clone)]
pub(crate) struct NormalizedMessage<'a> {
    /// Original raw text, used by the punctuation and emoji detectors
    pub raw: &'a str,
    /// Output of [`normalize`], used by every phrase matcher
    pub normalized: String,
}

impl<'a> NormalizedMessage<'a> {
    pub fn from_text(raw: &'a str) -> Self {
        Self {
            raw,
            normalized: normalize(raw),
        }
    }

    pub fn word_count(&self) -> usize {
        self.normalized.split_whitespace().count()
    }

    /// Substring match against any phrase in the list
    pub fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases
            .iter()
            .any(|phrase| self.normalized.contains(phrase))
    }
}
