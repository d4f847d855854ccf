//! Skill rule type definitions — the `skill-rules.json` format.
//!
//! A plugin ships at most one `skill-rules.json` file. It declares an
//! optional `version` and a `skills` object mapping each skill name to its
//! activation policy:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "skills": {
//!     "backend-dev-guidelines": {
//!       "type": "domain",
//!       "enforcement": "suggest",
//!       "priority": "high",
//!       "promptTriggers": {
//!         "keywords": ["backend", "controller"],
//!         "intentPatterns": ["(create|add).*?(route|endpoint)"]
//!       }
//!     }
//!   }
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    /// Protects against mistakes (e.g. "never edit generated files").
    Guardrail,
    /// Carries domain knowledge (e.g. "backend conventions").
    Domain,
}

/// Declared strength of a skill's recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    Block,
    Suggest,
    Warn,
}

/// Presentation priority of a skill.
///
/// Ordered from most to least urgent, so `Priority::Critical < Priority::Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Every priority, in presentation order.
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// The lower-case name used in `skill-rules.json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Guardrail => "guardrail",
            Self::Domain => "domain",
        })
    }
}

impl fmt::Display for Enforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Block => "block",
            Self::Suggest => "suggest",
            Self::Warn => "warn",
        })
    }
}

/// Conditions under which a prompt activates a skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTriggers {
    /// Case-insensitive substrings; any hit activates the skill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// Case-insensitive regex sources, evaluated as searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_patterns: Option<Vec<String>>,
}

impl PromptTriggers {
    /// Keywords, or an empty slice when none are declared.
    pub fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }

    /// Intent patterns, or an empty slice when none are declared.
    pub fn intent_patterns(&self) -> &[String] {
        self.intent_patterns.as_deref().unwrap_or_default()
    }

    /// Returns `true` if neither keywords nor patterns are declared.
    pub fn is_empty(&self) -> bool {
        self.keywords().is_empty() && self.intent_patterns().is_empty()
    }
}

/// One skill's activation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRule {
    #[serde(rename = "type")]
    pub kind: SkillType,

    pub enforcement: Enforcement,

    pub priority: Priority,

    /// Optional human-readable summary, shown by `skillgate list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// A rule without triggers is dormant and never matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_triggers: Option<PromptTriggers>,
}

/// Where a rule set was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSource {
    /// Name of the plugin directory that shipped the rules.
    pub plugin: String,

    /// Path to the `skill-rules.json` file.
    pub path: PathBuf,
}

/// The contents of one `skill-rules.json` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Carried through, never interpreted; any JSON value is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,

    /// Skills in document order. Duplicate names keep their first position
    /// and their last definition.
    #[serde(
        deserialize_with = "deserialize_ordered_skills",
        serialize_with = "serialize_ordered_skills"
    )]
    pub skills: Vec<(String, SkillRule)>,

    #[serde(skip)]
    pub source: RuleSource,
}

impl RuleSet {
    /// Look up a skill by name.
    pub fn get(&self, name: &str) -> Option<&SkillRule> {
        self.skills
            .iter()
            .find(|(skill, _)| skill == name)
            .map(|(_, rule)| rule)
    }
}

fn deserialize_ordered_skills<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, SkillRule)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedSkills;

    impl<'de> Visitor<'de> for OrderedSkills {
        type Value = Vec<(String, SkillRule)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping skill names to skill rules")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut skills: Vec<(String, SkillRule)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, rule)) = map.next_entry::<String, SkillRule>()? {
                match skills.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(slot) => slot.1 = rule,
                    None => skills.push((name, rule)),
                }
            }
            Ok(skills)
        }
    }

    deserializer.deserialize_map(OrderedSkills)
}

fn serialize_ordered_skills<S>(
    skills: &[(String, SkillRule)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(skills.len()))?;
    for (name, rule) in skills {
        map.serialize_entry(name, rule)?;
    }
    map.end()
}
