//! Hook payload received on stdin.
//!
//! Claude Code sends one JSON object per `UserPromptSubmit` event.  Only
//! `prompt` is required and must be a string.  `cwd` is consulted when it is
//! a non-empty string; every other field (`session_id`, `transcript_path`,
//! `permission_mode`, ...) is opaque and ignored whatever its type.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};

/// The `UserPromptSubmit` hook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    /// Working directory of the session; the project scope root.
    #[serde(default, deserialize_with = "lenient_path")]
    pub cwd: Option<PathBuf>,

    /// The user's prompt text.
    pub prompt: String,
}

impl HookInput {
    /// Parse a raw stdin payload.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            bail!("empty hook payload on stdin");
        }
        let input: Self = serde_json::from_str(raw).context("invalid hook payload")?;

        tracing::debug!(
            cwd = input.cwd.is_some(),
            prompt_len = input.prompt.len(),
            "hook payload parsed"
        );
        Ok(input)
    }
}

/// Accept any JSON value for `cwd`; only a non-empty string is kept.
fn lenient_path<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(PathBuf::from(s)),
        _ => None,
    })
}
