//! Error types for rule loading.

use std::path::PathBuf;

/// Errors raised while discovering or parsing skill rule sources.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid skill rules in `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot list plugins directory `{path}`: {source}")]
    InvalidPluginsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RuleError>;
