//! Skill rules for skillgate.
//!
//! This crate provides:
//!
//! - **Rule model** — typed `skill-rules.json` contents: [`SkillRule`],
//!   [`PromptTriggers`], and the closed [`SkillType`], [`Enforcement`] and
//!   [`Priority`] enumerations.
//!
//! - **Rule source loader** — discovers one `skill-rules.json` per plugin
//!   directory and parses it, skipping (and reporting) malformed sources.
//!
//! - **Rule merger** — folds every loaded [`RuleSet`] into one
//!   [`MergedRules`] mapping where later sources override earlier ones.
//!
//! # Example
//!
//! ```rust,no_run
//! use skillgate_rules::{load_rule_sets, merge, plugin_dirs};
//!
//! // Global scope first, then the project, so the project wins.
//! let dirs = plugin_dirs(&["/home/dev", "/work/project"]);
//! let report = load_rule_sets(&dirs);
//! let rules = merge(&report.rule_sets);
//!
//! for skill in &rules {
//!     println!("{} ({})", skill.name, skill.rule.priority);
//! }
//! ```

pub mod error;
pub mod loader;
pub mod merge;
pub mod types;

pub use error::{Result, RuleError};
pub use loader::{
    LoadReport, PLUGINS_SUBDIR, RULES_FILE_NAME, SourceDiagnostic, load_rule_set, load_rule_sets,
    plugin_dirs,
};
pub use merge::{MergedRules, MergedSkill, merge};
pub use types::{
    Enforcement, Priority, PromptTriggers, RuleSet, RuleSource, SkillRule, SkillType,
};
