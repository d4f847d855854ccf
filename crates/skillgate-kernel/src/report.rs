//! Priority reporter — renders matched skills as an advisory block.
//!
//! Matches are grouped into one section per [`Priority`] in the fixed order
//! critical, high, medium, low.  Empty sections are omitted and no report is
//! produced at all when nothing matched.

use skillgate_rules::Priority;

use crate::error::Result;
use crate::matcher::MatchRecord;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const HEADER: &str = "🎯 SKILL ACTIVATION CHECK";
const ACTION: &str = "ACTION: Use Skill tool BEFORE responding";

/// Section heading for a priority bucket.
pub fn section_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "⚠️ CRITICAL SKILLS (REQUIRED):",
        Priority::High => "📚 RECOMMENDED SKILLS:",
        Priority::Medium => "💡 SUGGESTED SKILLS:",
        Priority::Low => "📌 OPTIONAL SKILLS:",
    }
}

/// Render the advisory report, or `None` when there are no matches.
///
/// Within a section, skills keep the order they were matched in.
pub fn render(matches: &[MatchRecord<'_>]) -> Option<String> {
    if matches.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(256 + matches.len() * 32);
    out.push_str(RULE);
    out.push('\n');
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");

    for priority in Priority::ALL {
        let mut bucket = matches
            .iter()
            .filter(|m| m.rule.priority == priority)
            .peekable();
        if bucket.peek().is_none() {
            continue;
        }

        out.push_str(section_label(priority));
        out.push('\n');
        for m in bucket {
            out.push_str("  → ");
            out.push_str(m.name);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(ACTION);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    Some(out)
}

/// Render the matches as a pretty-printed JSON array.
pub fn render_json(matches: &[MatchRecord<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(matches)?)
}
