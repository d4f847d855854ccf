//! Rule source loader — discovers `skill-rules.json` files in plugin
//! directories.
//!
//! Each plugins directory (e.g. `~/.claude/plugins`) holds one
//! subdirectory per installed plugin.  A plugin may ship a
//! `skill-rules.json` file at its top level; plugins without one are
//! silently skipped.  A malformed file is reported as a
//! [`SourceDiagnostic`] and does not abort the load.

use std::path::{Path, PathBuf};

use crate::error::{Result, RuleError};
use crate::types::{RuleSet, RuleSource};

/// Name of the rules file looked up inside each plugin directory.
pub const RULES_FILE_NAME: &str = "skill-rules.json";

/// Path of the plugins directory relative to a scope root.
pub const PLUGINS_SUBDIR: [&str; 2] = [".claude", "plugins"];

/// A rule source that could not be loaded.
#[derive(Debug)]
pub struct SourceDiagnostic {
    /// Plugin directory name, or the plugins directory itself when it could
    /// not be listed.
    pub plugin: String,

    /// The rules file, or the plugins directory, that failed.
    pub path: PathBuf,

    pub error: RuleError,
}

/// Outcome of scanning a list of plugins directories.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully parsed rule sets, in precedence order.
    pub rule_sets: Vec<RuleSet>,

    /// One entry per source that was skipped because it failed to load.
    pub diagnostics: Vec<SourceDiagnostic>,
}

/// Map scope roots (home, project) to their plugins directories.
pub fn plugin_dirs<P: AsRef<Path>>(scope_roots: &[P]) -> Vec<PathBuf> {
    scope_roots
        .iter()
        .map(|root| {
            PLUGINS_SUBDIR
                .iter()
                .fold(root.as_ref().to_path_buf(), |path, part| path.join(part))
        })
        .collect()
}

/// Load rule sets from every plugin under the given plugins directories.
///
/// Directories are processed in the order given and plugins within a
/// directory in lexicographic order of their names, so the returned
/// rule sets are in merge precedence order (later overrides earlier).
/// Missing directories are skipped.
pub fn load_rule_sets<P: AsRef<Path>>(dirs: &[P]) -> LoadReport {
    let mut report = LoadReport::default();

    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            tracing::debug!(path = %dir.display(), "plugins directory does not exist");
            continue;
        }

        let plugins = match list_plugins(dir) {
            Ok(plugins) => plugins,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "failed to list plugins");
                report.diagnostics.push(SourceDiagnostic {
                    plugin: dir.display().to_string(),
                    path: dir.to_path_buf(),
                    error: e,
                });
                continue;
            }
        };

        for (plugin, plugin_dir) in plugins {
            let rules_path = plugin_dir.join(RULES_FILE_NAME);
            if !rules_path.is_file() {
                tracing::trace!(plugin = %plugin, "no skill rules, skipping");
                continue;
            }

            match load_rule_set(&rules_path) {
                Ok(set) => {
                    tracing::debug!(
                        plugin = %plugin,
                        skills = set.skills.len(),
                        "loaded skill rules"
                    );
                    report.rule_sets.push(set);
                }
                Err(e) => {
                    tracing::warn!(
                        plugin = %plugin,
                        error = %e,
                        "failed to load skill rules"
                    );
                    report.diagnostics.push(SourceDiagnostic {
                        plugin,
                        path: rules_path,
                        error: e,
                    });
                }
            }
        }
    }

    report
}

/// Load and parse a single `skill-rules.json` file.
///
/// The returned rule set's source plugin is the name of the file's parent
/// directory.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut set: RuleSet = serde_json::from_str(&content).map_err(|source| RuleError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    set.source = RuleSource {
        plugin: path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
    };

    Ok(set)
}

/// List the immediate plugin subdirectories of `dir`, sorted by name.
///
/// Entries that cannot be read are logged and skipped.
fn list_plugins(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir).map_err(|source| RuleError::InvalidPluginsDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut plugins = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name() {
            plugins.push((name.to_string_lossy().into_owned(), path.clone()));
        }
    }

    plugins.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(plugins)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    const RULES: &str = r#"{
        "version": "1.0",
        "skills": {
            "db-guard": {
                "type": "guardrail",
                "enforcement": "block",
                "priority": "critical",
                "promptTriggers": { "keywords": ["migration"] }
            }
        }
    }"#;

    fn write_plugin(root: &Path, plugin: &str, rules: Option<&str>) {
        let dir = root.join(plugin);
        std::fs::create_dir_all(&dir).unwrap();
        if let Some(rules) = rules {
            std::fs::write(dir.join(RULES_FILE_NAME), rules).unwrap();
        }
    }

    #[test]
    fn plugin_dirs_appends_claude_plugins() {
        let dirs = plugin_dirs(&["/home/dev", "/work/project"]);
        assert_eq!(
            dirs,
            [
                PathBuf::from("/home/dev/.claude/plugins"),
                PathBuf::from("/work/project/.claude/plugins"),
            ]
        );
    }

    #[test]
    fn load_from_nonexistent_dir() {
        let report = load_rule_sets(&[Path::new("/nonexistent/path")]);
        assert!(report.rule_sets.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn plugins_without_rules_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_plugin(tmp.path(), "no-rules", None);
        write_plugin(tmp.path(), "with-rules", Some(RULES));
        std::fs::write(tmp.path().join("stray-file.json"), RULES).unwrap();

        let report = load_rule_sets(&[tmp.path()]);
        assert_eq!(report.rule_sets.len(), 1);
        assert_eq!(report.rule_sets[0].source.plugin, "with-rules");
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn plugins_are_loaded_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        for plugin in ["charlie", "alpha", "bravo"] {
            write_plugin(tmp.path(), plugin, Some(RULES));
        }

        let report = load_rule_sets(&[tmp.path()]);
        let order: Vec<&str> = report
            .rule_sets
            .iter()
            .map(|s| s.source.plugin.as_str())
            .collect();
        assert_eq!(order, ["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn malformed_rules_produce_diagnostic() {
        let tmp = tempfile::tempdir().unwrap();
        write_plugin(tmp.path(), "broken", Some("{ not json"));
        write_plugin(tmp.path(), "good", Some(RULES));

        let report = load_rule_sets(&[tmp.path()]);
        assert_eq!(report.rule_sets.len(), 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].plugin, "broken");
        assert_eq!(
            report.diagnostics[0].path,
            tmp.path().join("broken").join(RULES_FILE_NAME)
        );
        assert!(matches!(report.diagnostics[0].error, RuleError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn broken_entry_does_not_drop_siblings() {
        let tmp = tempfile::tempdir().unwrap();
        write_plugin(tmp.path(), "alpha", Some(RULES));
        write_plugin(tmp.path(), "charlie", Some(RULES));
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("bravo")).unwrap();

        let report = load_rule_sets(&[tmp.path()]);
        let order: Vec<&str> = report
            .rule_sets
            .iter()
            .map(|s| s.source.plugin.as_str())
            .collect();
        assert_eq!(order, ["alpha", "charlie"]);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn load_single_file_records_source() {
        let tmp = tempfile::tempdir().unwrap();
        write_plugin(tmp.path(), "db-tools", Some(RULES));
        let path = tmp.path().join("db-tools").join(RULES_FILE_NAME);

        let set = load_rule_set(&path).unwrap();
        assert_eq!(set.source.plugin, "db-tools");
        assert_eq!(set.source.path, path);
        assert_eq!(set.get("db-guard").unwrap().priority, Priority::Critical);
    }

    #[test]
    fn load_single_missing_file_is_io_error() {
        let err = load_rule_set(Path::new("/nonexistent/skill-rules.json")).unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }
}
