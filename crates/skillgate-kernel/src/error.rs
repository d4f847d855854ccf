//! Kernel error types.
//!
//! Matching never fails as a whole: a trigger that cannot be compiled is
//! reported through [`KernelError`] and treated as non-matching, while every
//! other skill is still evaluated.

/// Error type for the matching kernel.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// An intent pattern supplied by a plugin is not a valid regex.
    #[error("invalid intent pattern `{pattern}` for skill `{skill}`: {reason}")]
    InvalidPattern {
        skill: String,
        pattern: String,
        reason: String,
    },

    /// The keyword automaton for a skill could not be built.
    #[error("keyword automaton build failed for skill `{skill}`: {reason}")]
    KeywordAutomaton { skill: String, reason: String },

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the kernel crate.
pub type Result<T> = std::result::Result<T, KernelError>;
