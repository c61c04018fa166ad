use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating an [`AnalyzerConfig`](crate::AnalyzerConfig).
///
/// Analysis itself never fails; these only surface at the configuration edge.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("medium_confidence ({medium}) must not exceed high_confidence ({high})")]
    InconsistentBands { medium: f64, high: f64 },
}
