use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalize::NormalizedMessage;

// ============================================================================
// Phrase Sets
// ============================================================================

/// Withdrawal and dismissal phrases. Matched as substrings of the normalized
/// text, so the bare "k" entry fires on any message containing the letter.
const WITHDRAWAL_PHRASES: &[&str] = &[
    "whatever",
    "idc",
    "dont care",
    "don’t care",
    "don't care",
    "whatever.",
    "fine.",
    "ok.",
    "k.",
    "k",
    "sure.",
    "great.",
    "cool.",
    "as you wish",
    "do what you want",
    "you do you",
    "it’s fine",
    "it's fine",
    "its fine",
    "i’m fine",
    "i'm fine",
    "im fine",
    "i’m okay",
    "i'm okay",
    "im okay",
    "okay.",
    "forget it",
    "leave me alone",
    "do whatever",
    "doesn’t matter",
    "doesn't matter",
    "doesnt matter",
];

/// Accusatory or hurt phrasing
const HURT_CUES: &[&str] = &[
    "you never",
    "you always",
    "you didn’t",
    "you didn't",
    "you didnt",
    "you wouldn’t",
    "you wouldn't",
    "you wouldnt",
    "you said",
    "after what you did",
    "how could you",
    "that hurt",
    "i don’t matter",
    "i don't matter",
    "i dont matter",
];

/// Whole-message curt replies
const DRY_SINGLETONS: &[&str] = &["k", "ok", "okay", "fine", "whatever"];

/// Hedging language whose absence is a weak signal
const SOFTENERS: &[&str] = &[
    "maybe",
    "perhaps",
    "could",
    "might",
    "i feel",
    "from my side",
    "i think",
];

const SAD_EMOJIS: &[char] = &['😔', '😞', '😢', '😭', '🙃', '🥲', '😑', '😒', '👎'];
const ANGRY_EMOJIS: &[char] = &['😠', '😡', '💢'];

const ELLIPSIS: &str = "...";

fn negation_regex() -> &'static Regex {
    static NEGATION: OnceLock<Regex> = OnceLock::new();
    NEGATION.get_or_init(|| {
        Regex::new(r"\b(?:no|not|don’t|don't|dont|never|nothing|noway)\b")
            .expect("negation pattern is valid")
    })
}

fn spaced_ellipsis_regex() -> &'static Regex {
    static SPACED_ELLIPSIS: OnceLock<Regex> = OnceLock::new();
    SPACED_ELLIPSIS.get_or_init(|| Regex::new(r"\.\s*\.\s*\.").expect("ellipsis pattern is valid"))
}

// ============================================================================
// Signal Types
// ============================================================================

/// A surfaced heuristic cue. Declaration order is the order explanations are
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Withdrawal or dismissal phrase ("fine.", "whatever", "i'm okay")
    Withdrawal,
    /// One or two word curt reply, or punctuation only
    DryReply,
    /// Accusatory or hurt phrasing ("you never", "how could you")
    HurtCue,
    /// "!!" or "??"
    RepeatedPunctuation,
    /// "..." or ". . ."
    Ellipsis,
    /// Sad or angry emoji
    Emoji,
    /// No hedging language at all
    MissingSoftener,
}

impl Signal {
    /// Human-readable explanation reported in analysis results
    pub fn explanation(&self) -> &'static str {
        match self {
            Signal::Withdrawal => "phrases suggesting withdrawal (‘fine’, ‘whatever’, ‘I’m okay’).",
            Signal::DryReply => "short/dry reply.",
            Signal::HurtCue => "hurt/accusatory cues (‘you never’, ‘after what you did’).",
            Signal::RepeatedPunctuation => "repeated punctuation (emotionally charged).",
            Signal::Ellipsis => "ellipsis (distance/withholding).",
            Signal::Emoji => "sad/angry emoji present.",
            Signal::MissingSoftener => "no softening language.",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.explanation())
    }
}

/// Every detector outcome for one message, computed in a single pass and
/// shared by the scorer, the explanation list and the action recommender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectedSignals {
    pub withdrawal: bool,
    pub dry_reply: bool,
    pub hurt_cue: bool,
    /// Scoring only, never reported as a signal
    pub negation: bool,
    pub repeated_punctuation: bool,
    pub ellipsis: bool,
    pub emoji_count: usize,
    pub missing_softener: bool,
}

impl DetectedSignals {
    pub fn detect(text: &str) -> Self {
        let msg = NormalizedMessage::from_text(text);
        Self {
            withdrawal: has_withdrawal_phrase(&msg),
            dry_reply: is_dry_reply(&msg),
            hurt_cue: has_hurt_cue(&msg),
            negation: has_negation(&msg),
            repeated_punctuation: has_repeated_punctuation(msg.raw),
            ellipsis: has_ellipsis(msg.raw),
            emoji_count: count_emojis(msg.raw),
            missing_softener: is_missing_softener(&msg),
        }
    }

    /// Fired signals in reporting order
    pub fn signals(&self) -> Vec<Signal> {
        [
            (self.withdrawal, Signal::Withdrawal),
            (self.dry_reply, Signal::DryReply),
            (self.hurt_cue, Signal::HurtCue),
            (self.repeated_punctuation, Signal::RepeatedPunctuation),
            (self.ellipsis, Signal::Ellipsis),
            (self.emoji_count > 0, Signal::Emoji),
            (self.missing_softener, Signal::MissingSoftener),
        ]
        .into_iter()
        .filter_map(|(fired, signal)| fired.then_some(signal))
        .collect()
    }
}

// ============================================================================
// Detectors
// ============================================================================

fn has_withdrawal_phrase(msg: &NormalizedMessage) -> bool {
    msg.contains_any(WITHDRAWAL_PHRASES)
}

fn is_dry_reply(msg: &NormalizedMessage) -> bool {
    let t = msg.normalized.as_str();

    if msg.word_count() <= 2 && (DRY_SINGLETONS.contains(&t) || t.ends_with('.') || t == "k") {
        return true;
    }

    // punctuation only: ".", "?!", "..."
    !t.is_empty() && t.chars().all(|c| matches!(c, '.' | '!' | '?'))
}

fn has_hurt_cue(msg: &NormalizedMessage) -> bool {
    msg.contains_any(HURT_CUES)
}

fn has_negation(msg: &NormalizedMessage) -> bool {
    negation_regex().is_match(&msg.normalized)
}

fn has_repeated_punctuation(raw: &str) -> bool {
    raw.contains("!!") || raw.contains("??")
}

fn has_ellipsis(raw: &str) -> bool {
    raw.contains(ELLIPSIS) || spaced_ellipsis_regex().is_match(raw)
}

fn count_emojis(raw: &str) -> usize {
    raw.chars()
        .filter(|c| SAD_EMOJIS.contains(c) || ANGRY_EMOJIS.contains(c))
        .count()
}

fn is_missing_softener(msg: &NormalizedMessage) -> bool {
    !msg.contains_any(SOFTENERS)
}
