//! skillgate matching kernel.
//!
//! This crate turns merged skill rules and a prompt into an advisory:
//!
//! - **[`matcher`]** -- two-level trigger matcher: case-folded keyword search
//!   (aho-corasick) followed by case-insensitive regex intent patterns.
//! - **[`report`]** -- groups matches by priority and renders the advisory
//!   block, or nothing when no skill matched.
//! - **[`error`]** -- kernel error types via [`thiserror`].
//!
//! Everything here is synchronous and free of I/O.

pub mod error;
pub mod matcher;
pub mod report;

// Re-export the most commonly used types at the crate root for convenience.
pub use error::{KernelError, Result};
pub use matcher::{MatchRecord, MatchType, SkillMatcher, match_skills};
pub use report::{render, render_json, section_label};
