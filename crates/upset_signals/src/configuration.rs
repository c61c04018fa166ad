use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const DEFAULT_UPSET_THRESHOLD: f64 = 0.5;
pub const DEFAULT_MEDIUM_CONFIDENCE: f64 = 0.55;
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 0.70;
pub const DEFAULT_RECENCY_FLOOR: f64 = 0.6;

/// Tunable thresholds for the analyzer.
///
/// Detector weights are fixed; only the cut-offs applied to the resulting
/// confidence and the conversation recency weighting can be overridden.
/// Every field is optional in YAML and falls back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Confidence at or above which a message is reported as upset
    pub upset_threshold: f64,
    /// Lower bound of the "medium" confidence band
    pub medium_confidence: f64,
    /// Lower bound of the "high" confidence band
    pub high_confidence: f64,
    /// Weight given to the oldest message of a conversation as n grows;
    /// the most recent message always weighs 1.0
    pub recency_floor: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            upset_threshold: DEFAULT_UPSET_THRESHOLD,
            medium_confidence: DEFAULT_MEDIUM_CONFIDENCE,
            high_confidence: DEFAULT_HIGH_CONFIDENCE,
            recency_floor: DEFAULT_RECENCY_FLOOR,
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AnalyzerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("upset_threshold", self.upset_threshold),
            ("medium_confidence", self.medium_confidence),
            ("high_confidence", self.high_confidence),
            ("recency_floor", self.recency_floor),
        ];
        for (field, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if self.medium_confidence > self.high_confidence {
            return Err(ConfigError::InconsistentBands {
                medium: self.medium_confidence,
                high: self.high_confidence,
            });
        }

        Ok(())
    }
}
