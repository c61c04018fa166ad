//! Heuristic detection of emotional upset in short messages and conversations.
//!
//! The engine extracts independent textual signals, folds them into a bounded
//! confidence score, thresholds that into a verdict and recommends one of a
//! few canned response strategies.

pub mod configuration;
pub mod errors;
pub mod signals;

pub use configuration::AnalyzerConfig;
pub use errors::ConfigError;
pub use signals::{
    analyze_conversation, analyze_message, suggest_action, AnalysisResult, ConversationEntry,
    Signal, SuggestedAction, UpsetAnalyzer,
};
