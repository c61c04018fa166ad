pub mod action;
pub mod analyzer;
pub mod detectors;
pub mod normalize;
pub mod scorer;

pub use action::{suggest_action, ConfidenceBand, SuggestedAction};
pub use analyzer::{
    analyze_conversation, analyze_message, AnalysisResult, ConversationEntry, UpsetAnalyzer,
};
pub use detectors::{DetectedSignals, Signal};
pub use normalize::normalize;
pub use scorer::{hostility_score, score_text};
