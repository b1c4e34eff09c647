use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading matcher configuration from disk.
///
/// Matching itself never fails; only reading rules can.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("field weights must not all be zero")]
    ZeroWeights,

    #[error("level thresholds must satisfy very_high >= high >= medium >= fair")]
    LevelsOutOfOrder,

    #[error("min_similarity must be within 0..=100, got {0}")]
    ThresholdOutOfRange(i64),
}
