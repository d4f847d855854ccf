//! The skill activation pipeline: load → merge → match → render.

use skillgate_kernel::{SkillMatcher, render};
use skillgate_rules::{MergedRules, load_rule_sets, merge};
use tracing::info;

use crate::config::ScopeConfig;

/// Load and merge the skill rules visible from `config`.
///
/// Sources that fail to load are logged and skipped.
pub fn load_rules(config: &ScopeConfig) -> MergedRules {
    let report = load_rule_sets(&config.plugin_dirs());
    if !report.diagnostics.is_empty() {
        info!(
            failed = report.diagnostics.len(),
            loaded = report.rule_sets.len(),
            "some skill rule sources were skipped"
        );
    }
    merge(&report.rule_sets)
}

/// Evaluate `prompt` and render the advisory, if any skill matched.
pub fn advise(config: &ScopeConfig, prompt: &str) -> Option<String> {
    let rules = load_rules(config);
    let matcher = SkillMatcher::new(&rules);
    let matches = matcher.evaluate(prompt);

    info!(
        skills = rules.len(),
        matched = matches.len(),
        "skill activation check complete"
    );
    render(&matches)
}
