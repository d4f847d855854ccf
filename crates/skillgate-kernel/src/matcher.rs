//! Two-level trigger matcher.
//!
//! Each skill's prompt triggers are evaluated in a fixed cascade:
//!
//! | Level | Technique | Match type |
//! |-------|-----------|------------|
//! | 1 | Substring search over case-folded keywords via [`aho_corasick`] | [`MatchType::Keyword`] |
//! | 2 | Case-insensitive search with compiled [`regex`] patterns | [`MatchType::Intent`] |
//!
//! A keyword hit short-circuits the skill: its patterns are not consulted
//! and it contributes exactly one [`MatchRecord`].
//!
//! Triggers are compiled once when the matcher is built.  A pattern that
//! fails to compile is kept as a [`KernelError::InvalidPattern`] diagnostic
//! and never matches; the remaining skills are unaffected.
//!
//! # Example
//!
//! ```rust
//! # use skillgate_kernel::matcher::{MatchType, SkillMatcher};
//! # use skillgate_rules::{merge, RuleSet};
//! let set: RuleSet = serde_json::from_str(r#"{
//!     "skills": {
//!         "deploy-guide": {
//!             "type": "domain",
//!             "enforcement": "suggest",
//!             "priority": "high",
//!             "promptTriggers": { "intentPatterns": ["how (do|can) i (deploy|ship)"] }
//!         }
//!     }
//! }"#).unwrap();
//! let rules = merge([&set]);
//!
//! let matcher = SkillMatcher::new(&rules);
//! let matches = matcher.evaluate("How can I deploy this service?");
//! assert_eq!(matches[0].name, "deploy-guide");
//! assert_eq!(matches[0].match_type, MatchType::Intent);
//! ```

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use skillgate_rules::{MergedRules, PromptTriggers, SkillRule};

use crate::error::KernelError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which trigger level activated a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Keyword,
    Intent,
}

/// A skill activated by the current prompt.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord<'a> {
    pub name: &'a str,
    pub match_type: MatchType,
    #[serde(rename = "config")]
    pub rule: &'a SkillRule,
}

// ---------------------------------------------------------------------------
// SkillMatcher
// ---------------------------------------------------------------------------

/// Compiled triggers for every non-dormant skill of a [`MergedRules`].
///
/// Skills are evaluated in the merged rules' iteration order, so matches are
/// returned in that order as well; priority ordering is the reporter's job.
pub struct SkillMatcher<'a> {
    skills: Vec<CompiledSkill<'a>>,
    diagnostics: Vec<KernelError>,
}

struct CompiledSkill<'a> {
    name: &'a str,
    rule: &'a SkillRule,
    keywords: KeywordSet,
    /// Compiled intent patterns; invalid ones are left out.
    patterns: Vec<Regex>,
}

/// Lower-cased keywords with an optional automaton over them.
///
/// Falls back to plain substring search if the automaton cannot be built.
struct KeywordSet {
    lowered: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl<'a> SkillMatcher<'a> {
    /// Compile the triggers of every skill in `rules`.
    ///
    /// Skills without triggers are dormant and left out entirely.
    pub fn new(rules: &'a MergedRules) -> Self {
        let mut skills = Vec::with_capacity(rules.len());
        let mut diagnostics = Vec::new();

        for entry in rules {
            let Some(triggers) = entry.rule.prompt_triggers.as_ref() else {
                tracing::trace!(skill = %entry.name, "no prompt triggers, dormant");
                continue;
            };
            if triggers.is_empty() {
                tracing::trace!(skill = %entry.name, "empty prompt triggers, dormant");
                continue;
            }

            skills.push(compile_skill(
                &entry.name,
                &entry.rule,
                triggers,
                &mut diagnostics,
            ));
        }

        tracing::debug!(
            skills = skills.len(),
            diagnostics = diagnostics.len(),
            "skill triggers compiled"
        );

        Self {
            skills,
            diagnostics,
        }
    }

    /// Evaluate a prompt against every compiled skill.
    ///
    /// The prompt is lower-cased once; keywords are compared as substrings
    /// of the lowered prompt and patterns are searched case-insensitively.
    pub fn evaluate(&self, prompt: &str) -> Vec<MatchRecord<'a>> {
        let lowered = prompt.to_lowercase();
        let mut matches = Vec::new();

        for skill in &self.skills {
            // Level 1: keywords.
            if skill.keywords.is_match(&lowered) {
                tracing::debug!(skill = %skill.name, "keyword match");
                matches.push(MatchRecord {
                    name: skill.name,
                    match_type: MatchType::Keyword,
                    rule: skill.rule,
                });
                continue;
            }

            // Level 2: intent patterns.
            if skill.patterns.iter().any(|re| re.is_match(&lowered)) {
                tracing::debug!(skill = %skill.name, "intent match");
                matches.push(MatchRecord {
                    name: skill.name,
                    match_type: MatchType::Intent,
                    rule: skill.rule,
                });
            }
        }

        matches
    }

    /// Problems found while compiling triggers.
    pub fn diagnostics(&self) -> &[KernelError] {
        &self.diagnostics
    }

    /// Return the number of skills with at least one trigger.
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

/// Compile `rules` and evaluate `prompt` in one step.
pub fn match_skills<'a>(rules: &'a MergedRules, prompt: &str) -> Vec<MatchRecord<'a>> {
    SkillMatcher::new(rules).evaluate(prompt)
}

// ---------------------------------------------------------------------------
// Compilation helpers
// ---------------------------------------------------------------------------

fn compile_skill<'a>(
    name: &'a str,
    rule: &'a SkillRule,
    triggers: &PromptTriggers,
    diagnostics: &mut Vec<KernelError>,
) -> CompiledSkill<'a> {
    let keywords = KeywordSet::build(name, triggers.keywords(), diagnostics);

    let mut patterns = Vec::with_capacity(triggers.intent_patterns().len());
    for pattern in triggers.intent_patterns() {
        match compile_pattern(name, pattern) {
            Ok(re) => patterns.push(re),
            Err(e) => {
                tracing::warn!(skill = %name, error = %e, "skipping invalid intent pattern");
                diagnostics.push(e);
            }
        }
    }

    CompiledSkill {
        name,
        rule,
        keywords,
        patterns,
    }
}

/// Compile one intent pattern with the case-insensitive flag set.
fn compile_pattern(skill: &str, pattern: &str) -> Result<Regex, KernelError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| KernelError::InvalidPattern {
            skill: skill.to_string(),
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

impl KeywordSet {
    fn build(skill: &str, keywords: &[String], diagnostics: &mut Vec<KernelError>) -> Self {
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        if lowered.is_empty() {
            return Self {
                lowered,
                automaton: None,
            };
        }

        let automaton = match AhoCorasick::new(&lowered) {
            Ok(ac) => Some(ac),
            Err(e) => {
                tracing::warn!(skill = %skill, error = %e, "failed to build keyword automaton");
                diagnostics.push(KernelError::KeywordAutomaton {
                    skill: skill.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        };

        Self { lowered, automaton }
    }

    fn is_match(&self, lowered_prompt: &str) -> bool {
        match &self.automaton {
            Some(ac) => ac.is_match(lowered_prompt),
            None => self.lowered.iter().any(|k| lowered_prompt.contains(k.as_str())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skillgate_rules::{Enforcement, Priority, RuleSource, SkillType};

    fn rule(keywords: &[&str], patterns: &[&str]) -> SkillRule {
        let list = |items: &[&str]| -> Option<Vec<String>> {
            (!items.is_empty()).then(|| items.iter().map(|s| s.to_string()).collect())
        };
        SkillRule {
            kind: SkillType::Domain,
            enforcement: Enforcement::Suggest,
            priority: Priority::High,
            description: None,
            prompt_triggers: Some(PromptTriggers {
                keywords: list(keywords),
                intent_patterns: list(patterns),
            }),
        }
    }

    fn rules(skills: Vec<(&str, SkillRule)>) -> MergedRules {
        let mut merged = MergedRules::new();
        for (name, rule) in skills {
            merged.insert(name, rule, RuleSource::default());
        }
        merged
    }

    #[test]
    fn keyword_match_case_insensitive() {
        let rules = rules(vec![("refactoring", rule(&["refactor"], &[]))]);
        let matches = match_skills(&rules, "I need a REFACTOR now");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "refactoring");
        assert_eq!(matches[0].match_type, MatchType::Keyword);
    }

    #[test]
    fn upper_case_keyword_matches_lower_case_prompt() {
        let rules = rules(vec![("api", rule(&["GraphQL"], &[]))]);
        let matches = match_skills(&rules, "add a graphql resolver");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn intent_pattern_match() {
        let rules = rules(vec![(
            "deploy",
            rule(&[], &["how (do|can) i (deploy|ship)"]),
        )]);
        let matches = match_skills(&rules, "How can I deploy this service?");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Intent);
    }

    #[test]
    fn pattern_with_upper_case_literal_still_matches() {
        let rules = rules(vec![("api", rule(&[], &[r"REST\s+API"]))]);
        let matches = match_skills(&rules, "design a rest api for orders");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn keyword_takes_precedence_over_pattern() {
        let rules = rules(vec![("db", rule(&["schema"], &["schema"]))]);
        let matches = match_skills(&rules, "update the schema");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Keyword);
    }

    #[test]
    fn pattern_checked_when_keywords_miss() {
        let rules = rules(vec![("db", rule(&["postgres"], &["(add|drop) (a )?column"]))]);
        let matches = match_skills(&rules, "drop a column from users");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Intent);
    }

    #[test]
    fn no_match_yields_nothing() {
        let rules = rules(vec![("db", rule(&["postgres"], &["migrat(e|ion)"]))]);
        assert!(match_skills(&rules, "write a haiku").is_empty());
    }

    #[test]
    fn dormant_skill_never_matches() {
        let mut merged = rules(vec![]);
        let mut dormant = rule(&[], &[]);
        dormant.prompt_triggers = None;
        merged.insert("dormant", dormant, RuleSource::default());
        merged.insert("empty", rule(&[], &[]), RuleSource::default());

        let matcher = SkillMatcher::new(&merged);
        assert_eq!(matcher.skill_count(), 0);
        for prompt in ["", "dormant", "anything at all"] {
            assert!(matcher.evaluate(prompt).is_empty());
        }
    }

    #[test]
    fn invalid_pattern_is_isolated() {
        let rules = rules(vec![
            ("broken", rule(&[], &["[invalid(", "deploy"])),
            ("healthy", rule(&[], &["deploy"])),
        ]);

        let matcher = SkillMatcher::new(&rules);
        assert_eq!(matcher.diagnostics().len(), 1);
        assert!(matches!(
            &matcher.diagnostics()[0],
            KernelError::InvalidPattern { skill, .. } if skill == "broken"
        ));

        // The broken skill's valid pattern and the other skill still match.
        let names: Vec<&str> = matcher.evaluate("deploy it").iter().map(|m| m.name).collect();
        assert_eq!(names, ["broken", "healthy"]);
    }

    #[test]
    fn matches_follow_rule_order() {
        let rules = rules(vec![
            ("zeta", rule(&["test"], &[])),
            ("alpha", rule(&["test"], &[])),
            ("mid", rule(&[], &["test"])),
        ]);
        let names: Vec<&str> = match_skills(&rules, "write a test")
            .iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let rules = rules(vec![
            ("a", rule(&["api"], &[])),
            ("b", rule(&[], &["end ?point"])),
            ("c", rule(&["nothing"], &[])),
        ]);
        let matcher = SkillMatcher::new(&rules);
        let first: Vec<(&str, MatchType)> = matcher
            .evaluate("new API endpoint")
            .iter()
            .map(|m| (m.name, m.match_type))
            .collect();
        for _ in 0..5 {
            let again: Vec<(&str, MatchType)> = matcher
                .evaluate("new API endpoint")
                .iter()
                .map(|m| (m.name, m.match_type))
                .collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn record_serializes_with_match_type() {
        let rules = rules(vec![("db", rule(&["schema"], &[]))]);
        let matches = match_skills(&rules, "schema");
        let value = serde_json::to_value(&matches[0]).unwrap();
        assert_eq!(value["name"], "db");
        assert_eq!(value["matchType"], "keyword");
        assert_eq!(value["config"]["priority"], "high");
    }
}
