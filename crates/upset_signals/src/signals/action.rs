use serde::{Deserialize, Serialize};

use super::detectors::{DetectedSignals, Signal};
use crate::configuration::AnalyzerConfig;

/// Canned response strategy recommended to the person replying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    OwnAndApologize,
    AcknowledgeAndInvite,
    OfferSpace,
    ClarifyGently,
}

impl SuggestedAction {
    pub fn template(&self) -> &'static str {
        match self {
            SuggestedAction::OwnAndApologize => {
                "I’m sorry I let you down there. I care about how you feel, \
                 and I want to make it right. What would help right now?"
            }
            SuggestedAction::AcknowledgeAndInvite => {
                "I may have missed something. Your feelings matter to me—\
                 do you want to talk about it? I’m listening."
            }
            SuggestedAction::OfferSpace => {
                "I can sense this is heavy. I’m here for you, and I’ll give you a bit \
                 of space if you need it. Message me when you’re ready."
            }
            SuggestedAction::ClarifyGently => {
                "I want to understand you better. Could you help me see what I missed? \
                 I’m asking so I can do better."
            }
        }
    }
}

/// Named confidence bands. High and Medium route identically; only Low
/// falls back to clarifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn classify(confidence: f64, config: &AnalyzerConfig) -> Self {
        if confidence >= config.high_confidence {
            ConfidenceBand::High
        } else if confidence >= config.medium_confidence {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    fn is_elevated(self) -> bool {
        matches!(self, ConfidenceBand::High | ConfidenceBand::Medium)
    }
}

/// Recommend a response for `text` given the signals gathered so far and the
/// overall confidence, using the default thresholds.
pub fn suggest_action(text: &str, signals: &[Signal], confidence: f64) -> SuggestedAction {
    recommend(
        &DetectedSignals::detect(text),
        signals,
        confidence,
        &AnalyzerConfig::default(),
    )
}

/// Decision tree, first match wins. `detected` describes the anchoring
/// message; `signals` may span a whole conversation.
pub(crate) fn recommend(
    detected: &DetectedSignals,
    signals: &[Signal],
    confidence: f64,
    config: &AnalyzerConfig,
) -> SuggestedAction {
    let elevated = ConfidenceBand::classify(confidence, config).is_elevated();

    if detected.hurt_cue || signals.contains(&Signal::HurtCue) {
        return SuggestedAction::OwnAndApologize;
    }

    if detected.dry_reply || detected.withdrawal {
        return if elevated {
            SuggestedAction::AcknowledgeAndInvite
        } else {
            SuggestedAction::ClarifyGently
        };
    }

    if detected.repeated_punctuation || detected.emoji_count > 0 {
        return SuggestedAction::AcknowledgeAndInvite;
    }

    if detected.ellipsis {
        return if elevated {
            SuggestedAction::OfferSpace
        } else {
            SuggestedAction::ClarifyGently
        };
    }

    SuggestedAction::ClarifyGently
}
