//! Rule merger — folds rule sets into a single name-keyed mapping.
//!
//! Later sources override earlier ones on name collision, which is how a
//! project-local plugin replaces a global one.  An overridden skill keeps
//! the position where its name was first seen.

use std::collections::HashMap;

use crate::types::{RuleSet, RuleSource, SkillRule};

/// A merged skill entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSkill {
    pub name: String,
    pub rule: SkillRule,
    /// The source whose definition won.
    pub source: RuleSource,
}

/// Skill rules from every source, keyed by unique skill name.
///
/// Iteration follows first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct MergedRules {
    entries: Vec<MergedSkill>,
    index: HashMap<String, usize>,
}

impl MergedRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a skill.
    pub fn insert(&mut self, name: impl Into<String>, rule: SkillRule, source: RuleSource) {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            let entry = &mut self.entries[idx];
            tracing::debug!(
                skill = %name,
                previous = %entry.source.plugin,
                plugin = %source.plugin,
                "skill rule overridden"
            );
            entry.rule = rule;
            entry.source = source;
            return;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(MergedSkill { name, rule, source });
    }

    pub fn get(&self, name: &str) -> Option<&SkillRule> {
        self.entry(name).map(|e| &e.rule)
    }

    /// Get the full entry, including the supplying source.
    pub fn entry(&self, name: &str) -> Option<&MergedSkill> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergedSkill> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a MergedRules {
    type Item = &'a MergedSkill;
    type IntoIter = std::slice::Iter<'a, MergedSkill>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fold rule sets left to right; the last definition of a name wins.
pub fn merge<'a, I>(rule_sets: I) -> MergedRules
where
    I: IntoIterator<Item = &'a RuleSet>,
{
    rule_sets.into_iter().fold(MergedRules::new(), |mut acc, set| {
        for (name, rule) in &set.skills {
            acc.insert(name.clone(), rule.clone(), set.source.clone());
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Enforcement, Priority, SkillType};

    fn rule(priority: Priority) -> SkillRule {
        SkillRule {
            kind: SkillType::Domain,
            enforcement: Enforcement::Suggest,
            priority,
            description: None,
            prompt_triggers: None,
        }
    }

    fn set(plugin: &str, skills: &[(&str, Priority)]) -> RuleSet {
        RuleSet {
            version: Some("1.0".into()),
            skills: skills
                .iter()
                .map(|(name, p)| (name.to_string(), rule(*p)))
                .collect(),
            source: RuleSource {
                plugin: plugin.into(),
                path: Default::default(),
            },
        }
    }

    #[test]
    fn later_source_wins() {
        let a = set("global", &[("x", Priority::Low)]);
        let b = set("project", &[("x", Priority::Critical)]);

        let merged = merge([&a, &b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("x").unwrap().priority, Priority::Critical);
        assert_eq!(merged.entry("x").unwrap().source.plugin, "project");
    }

    #[test]
    fn override_keeps_first_position() {
        let a = set("global", &[("x", Priority::Low), ("y", Priority::Low)]);
        let b = set("project", &[("z", Priority::High), ("x", Priority::High)]);

        let merged = merge(&[a, b]);
        let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert_eq!(merged.get("x").unwrap().priority, Priority::High);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged = merge(std::iter::empty::<&RuleSet>());
        assert!(merged.is_empty());
        assert!(merged.get("x").is_none());
    }

    #[test]
    fn merge_is_pure() {
        let sets = [set("a", &[("x", Priority::Low)]), set("b", &[("y", Priority::Medium)])];
        let first = merge(&sets);
        let second = merge(&sets);
        let names = |m: &MergedRules| m.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&first), names(&second));
    }
}
