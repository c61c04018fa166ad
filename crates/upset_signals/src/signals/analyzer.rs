//! Upset analysis for single messages and short conversations.
//!
//! Both entry points run the same detectors once per message, feed them to
//! the hostility scorer and the action recommender, and return an
//! [`AnalysisResult`] ready to be serialized.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::action::recommend;
use super::detectors::{DetectedSignals, Signal};
use super::scorer::hostility_score;
use crate::configuration::AnalyzerConfig;
use crate::errors::ConfigError;

// ============================================================================
// Constants
// ============================================================================

const MESSAGE_UPSET_REASON: &str = "Message contains multiple upset signals.";
const MESSAGE_CALM_REASON: &str = "Few or weak upset signals detected.";
const CONVERSATION_UPSET_REASON: &str = "Recent messages tilt upset.";
const CONVERSATION_CALM_REASON: &str = "Tone mostly neutral.";
const NO_MESSAGES_REASON: &str = "No messages to analyze.";
const NO_MESSAGES_ACTION: &str = "Ask a gentle, open question to invite sharing.";

// ============================================================================
// Types
// ============================================================================

/// One message of a conversation. List order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Message text
    pub text: String,
    /// Free-form author label ("sender", "her", ...)
    pub author: String,
}

impl ConversationEntry {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// Outcome of analyzing a message or a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Whether the confidence reached the upset threshold
    pub is_upset: bool,
    /// Hostility confidence in [0, 1], rounded to two decimals
    pub confidence: f64,
    /// Explanations of the fired signals, first occurrence order
    pub signals: Vec<String>,
    /// Short verdict explanation
    pub reason: String,
    /// Recommended reply strategy
    pub suggested_action: String,
}

impl AnalysisResult {
    fn no_messages() -> Self {
        Self {
            is_upset: false,
            confidence: 0.0,
            signals: Vec::new(),
            reason: NO_MESSAGES_REASON.to_string(),
            suggested_action: NO_MESSAGES_ACTION.to_string(),
        }
    }
}

/// Detector outcomes and score for one message, before rounding
struct MessageAssessment {
    detected: DetectedSignals,
    signals: Vec<Signal>,
    confidence: f64,
}

/// Two-decimal rounding of the exact decimal value, so 0.015 (stored just
/// below) becomes 0.01 rather than 0.02.
fn round_confidence(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

fn explanations(signals: &[Signal]) -> Vec<String> {
    signals
        .iter()
        .map(|signal| signal.explanation().to_string())
        .collect()
}

// ============================================================================
// Upset Analyzer
// ============================================================================

/// Stateless analyzer; holds only its thresholds and can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct UpsetAnalyzer {
    config: AnalyzerConfig,
}

impl UpsetAnalyzer {
    /// Create an analyzer with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom thresholds
    pub fn with_config(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn assess(&self, text: &str) -> MessageAssessment {
        let detected = DetectedSignals::detect(text);
        MessageAssessment {
            signals: detected.signals(),
            confidence: hostility_score(&detected),
            detected,
        }
    }

    /// Weight of the message at `index` among `count` messages. Grows
    /// linearly from just above the recency floor to 1.0 for the latest one.
    fn recency_weight(&self, index: usize, count: usize) -> f64 {
        let floor = self.config.recency_floor;
        floor + (1.0 - floor) * (index + 1) as f64 / count as f64
    }

    /// Analyze a single message. Any input, including an empty string,
    /// yields a well-formed result.
    pub fn analyze_message(&self, text: &str) -> AnalysisResult {
        let MessageAssessment {
            detected,
            signals,
            confidence,
        } = self.assess(text);

        let is_upset = confidence >= self.config.upset_threshold;
        let action = recommend(&detected, &signals, confidence, &self.config);

        debug!(
            confidence,
            is_upset,
            signal_count = signals.len(),
            action = ?action,
            "analyzed message"
        );

        AnalysisResult {
            is_upset,
            confidence: round_confidence(confidence),
            signals: explanations(&signals),
            reason: if is_upset {
                MESSAGE_UPSET_REASON
            } else {
                MESSAGE_CALM_REASON
            }
            .to_string(),
            suggested_action: action.template().to_string(),
        }
    }

    /// Analyze an ordered conversation, optionally restricted to one author.
    ///
    /// Later messages weigh more. The recommendation is anchored to the last
    /// considered message while the confidence reflects the whole window.
    pub fn analyze_conversation(
        &self,
        entries: &[ConversationEntry],
        focus_author: Option<&str>,
    ) -> AnalysisResult {
        let filtered: Vec<&ConversationEntry> = match focus_author.filter(|a| !a.is_empty()) {
            Some(author) => entries.iter().filter(|e| e.author == author).collect(),
            None => entries.iter().collect(),
        };

        if filtered.is_empty() {
            debug!(
                total = entries.len(),
                focus_author = ?focus_author,
                "no messages left to analyze"
            );
            return AnalysisResult::no_messages();
        }

        let count = filtered.len();
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        let mut signals: Vec<Signal> = Vec::new();
        let mut last_detected = DetectedSignals::default();

        for (index, entry) in filtered.iter().enumerate() {
            let weight = self.recency_weight(index, count);
            let assessment = self.assess(&entry.text);
            let confidence = round_confidence(assessment.confidence);

            trace!(index, weight, confidence, author = %entry.author, "weighted message");

            weighted_sum += confidence * weight;
            total_weight += weight;

            for signal in assessment.signals {
                if !signals.contains(&signal) {
                    signals.push(signal);
                }
            }
            last_detected = assessment.detected;
        }

        let aggregate = weighted_sum / total_weight;
        let is_upset = aggregate >= self.config.upset_threshold;
        let action = recommend(&last_detected, &signals, aggregate, &self.config);

        debug!(
            messages = count,
            aggregate,
            is_upset,
            action = ?action,
            "analyzed conversation"
        );

        AnalysisResult {
            is_upset,
            confidence: round_confidence(aggregate),
            signals: explanations(&signals),
            reason: if is_upset {
                CONVERSATION_UPSET_REASON
            } else {
                CONVERSATION_CALM_REASON
            }
            .to_string(),
            suggested_action: action.template().to_string(),
        }
    }
}

/// Analyze a single message with the default thresholds
pub fn analyze_message(text: &str) -> AnalysisResult {
    UpsetAnalyzer::new().analyze_message(text)
}

/// Analyze a conversation with the default thresholds
pub fn analyze_conversation(
    entries: &[ConversationEntry],
    focus_author: Option<&str>,
) -> AnalysisResult {
    UpsetAnalyzer::new().analyze_conversation(entries, focus_author)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::action::SuggestedAction;
    use pretty_assertions::assert_eq;

    fn entries(author: &str, texts: &[&str]) -> Vec<ConversationEntry> {
        texts
            .iter()
            .map(|text| ConversationEntry::new(*text, author))
            .collect()
    }

    #[test]
    fn test_dry_withdrawal_message() {
        let result = analyze_message("whatever.");
        assert_eq!(result.confidence, 0.52);
        assert!(result.is_upset);
        assert_eq!(
            result.signals,
            vec![
                Signal::Withdrawal.explanation(),
                Signal::DryReply.explanation(),
                Signal::MissingSoftener.explanation(),
            ]
        );
        assert_eq!(result.reason, MESSAGE_UPSET_REASON);
        // 0.52 is below the medium band
        assert_eq!(
            result.suggested_action,
            SuggestedAction::ClarifyGently.template()
        );
    }

    #[test]
    fn test_accusatory_message() {
        let result = analyze_message("you never listen to me!!");
        assert_eq!(result.confidence, 0.8);
        assert!(result.is_upset);
        assert_eq!(
            result.signals,
            vec![
                Signal::HurtCue.explanation(),
                Signal::RepeatedPunctuation.explanation(),
                Signal::MissingSoftener.explanation(),
            ]
        );
        assert_eq!(
            result.suggested_action,
            SuggestedAction::OwnAndApologize.template()
        );
    }

    #[test]
    fn test_neutral_message() {
        let result = analyze_message("sounds good, see you then");
        assert_eq!(result.confidence, 0.05);
        assert!(!result.is_upset);
        assert_eq!(result.signals, vec![Signal::MissingSoftener.explanation()]);
        assert_eq!(result.reason, MESSAGE_CALM_REASON);
        assert_eq!(
            result.suggested_action,
            SuggestedAction::ClarifyGently.template()
        );
    }

    #[test]
    fn test_hurt_cue_below_threshold_still_apologizes() {
        // "could" counts as a softener
        let result = analyze_message("how could you");
        assert_eq!(result.confidence, 0.45);
        assert!(!result.is_upset);
        assert_eq!(
            result.suggested_action,
            SuggestedAction::OwnAndApologize.template()
        );
    }

    #[test]
    fn test_empty_and_blank_messages() {
        for text in ["", "   \t\n"] {
            let result = analyze_message(text);
            assert_eq!(result.confidence, 0.05);
            assert!(!result.is_upset);
            assert_eq!(
                result.suggested_action,
                SuggestedAction::ClarifyGently.template()
            );
        }
    }

    #[test]
    fn test_exact_half_is_upset() {
        // negation + dry + ellipsis + missing softener
        let result = analyze_message("no...");
        assert_eq!(result.confidence, 0.5);
        assert!(result.is_upset);
        assert_eq!(result.reason, MESSAGE_UPSET_REASON);

        // dry + repeated punctuation + ellipsis + missing softener
        let result = analyze_message("...!!");
        assert_eq!(result.confidence, 0.5);
        assert!(result.is_upset);
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.015), 0.01);
        assert_eq!(round_confidence(0.41821), 0.42);
        assert_eq!(round_confidence(0.5), 0.5);
        assert_eq!(round_confidence(0.0), 0.0);
        assert_eq!(round_confidence(1.0), 1.0);
    }

    #[test]
    fn test_message_invariants() {
        let inputs = [
            "",
            "k",
            "?!",
            "fine 😒",
            "No. Just no!!",
            "I feel like maybe we should talk later...",
            "you always do this. after what you did... whatever!! 😡😭",
            "Hey! Dinner at 7?",
        ];
        for text in inputs {
            let result = analyze_message(text);
            assert!((0.0..=1.0).contains(&result.confidence), "{text:?}");
            assert_eq!(result.is_upset, result.confidence >= 0.5, "{text:?}");
            assert_eq!(result, analyze_message(text), "{text:?}");
        }
    }

    #[test]
    fn test_result_serializes_in_field_order() {
        let json = serde_json::to_string(&analyze_message("k")).unwrap();
        let is_upset = json.find("\"is_upset\"").unwrap();
        let confidence = json.find("\"confidence\"").unwrap();
        let signals = json.find("\"signals\"").unwrap();
        let reason = json.find("\"reason\"").unwrap();
        let action = json.find("\"suggested_action\"").unwrap();
        assert!(is_upset < confidence && confidence < signals);
        assert!(signals < reason && reason < action);
    }

    #[test]
    fn test_empty_conversation() {
        let result = analyze_conversation(&[], None);
        assert!(!result.is_upset);
        assert_eq!(result.confidence, 0.0);
        assert!(result.signals.is_empty());
        assert_eq!(result.reason, NO_MESSAGES_REASON);
        assert_eq!(result.suggested_action, NO_MESSAGES_ACTION);
    }

    #[test]
    fn test_focus_author_filters_everything_out() {
        let messages = entries("her", &["you never listen to me!!"]);
        let result = analyze_conversation(&messages, Some("sender"));
        assert_eq!(result, AnalysisResult::no_messages());
    }

    #[test]
    fn test_weighted_average() {
        let texts = [
            "you never listen to me!!",
            "whatever.",
            "sounds good, see you then",
        ];
        let messages = entries("sender", &texts);

        let n = texts.len() as f64;
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (i, text) in texts.iter().enumerate() {
            let w = 0.6 + 0.4 * (i + 1) as f64 / n;
            weighted += analyze_message(text).confidence * w;
            total += w;
        }
        let expected = weighted / total;

        let result = analyze_conversation(&messages, None);
        assert!((result.confidence - round_confidence(expected)).abs() < 1e-9);
        assert_eq!(result.confidence, 0.42);
        assert!(!result.is_upset);
        assert_eq!(result.reason, CONVERSATION_CALM_REASON);
        // hurt cue from the first message still drives the recommendation
        assert_eq!(
            result.suggested_action,
            SuggestedAction::OwnAndApologize.template()
        );
    }

    #[test]
    fn test_recent_messages_weigh_more() {
        let calm = "sounds good, see you then";
        let upset = "you never listen to me!!";

        let upset_last = analyze_conversation(&entries("a", &[calm, upset]), None);
        let upset_first = analyze_conversation(&entries("a", &[upset, calm]), None);

        assert!(upset_last.confidence > upset_first.confidence);
    }

    #[test]
    fn test_signals_deduplicated_in_first_seen_order() {
        let messages = entries("sender", &["whatever.", "you never listen!!", "fine."]);
        let result = analyze_conversation(&messages, None);
        assert_eq!(
            result.signals,
            vec![
                Signal::Withdrawal.explanation(),
                Signal::DryReply.explanation(),
                Signal::MissingSoftener.explanation(),
                Signal::HurtCue.explanation(),
                Signal::RepeatedPunctuation.explanation(),
            ]
        );
    }

    #[test]
    fn test_focus_author_keeps_only_their_messages() {
        let messages = vec![
            ConversationEntry::new("whatever.", "alice"),
            ConversationEntry::new("you never listen to me!!", "bob"),
        ];
        let result = analyze_conversation(&messages, Some("alice"));
        assert_eq!(result.confidence, 0.52);
        assert!(result.is_upset);
        assert_eq!(result.reason, CONVERSATION_UPSET_REASON);
        assert!(!result.signals.contains(&Signal::HurtCue.explanation().to_string()));
        assert_eq!(
            result.suggested_action,
            SuggestedAction::ClarifyGently.template()
        );
    }

    #[test]
    fn test_empty_focus_author_means_everyone() {
        let messages = vec![
            ConversationEntry::new("whatever.", "alice"),
            ConversationEntry::new("you never listen to me!!", "bob"),
        ];
        assert_eq!(
            analyze_conversation(&messages, Some("")),
            analyze_conversation(&messages, None)
        );
    }

    #[test]
    fn test_single_entry_matches_message_confidence() {
        let messages = entries("sender", &["whatever."]);
        let result = analyze_conversation(&messages, None);
        assert_eq!(result.confidence, analyze_message("whatever.").confidence);
    }

    #[test]
    fn test_action_anchored_to_last_message() {
        // earlier outburst lifts the aggregate, the last message only trails off
        let messages = entries("sender", &["no!!😡 fine.", "no... not now..."]);
        let result = analyze_conversation(&messages, None);
        assert_eq!(result.confidence, 0.56);
        assert!(result.is_upset);
        assert_eq!(
            result.suggested_action,
            SuggestedAction::OfferSpace.template()
        );
    }

    #[test]
    fn test_custom_upset_threshold() {
        let config = AnalyzerConfig {
            upset_threshold: 0.3,
            ..AnalyzerConfig::default()
        };
        let analyzer = UpsetAnalyzer::with_config(config).unwrap();
        let result = analyzer.analyze_message("...");
        assert_eq!(result.confidence, 0.35);
        assert!(result.is_upset);
        assert!(!analyze_message("...").is_upset);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyzerConfig {
            upset_threshold: -0.1,
            ..AnalyzerConfig::default()
        };
        assert!(UpsetAnalyzer::with_config(config).is_err());
    }
}
