//! Scope configuration.
//!
//! Skill rules are discovered under two scope roots: the global scope (the
//! user's home) and the project scope (the session's working directory).
//! Each root contributes `<root>/.claude/plugins`.  Extra plugins
//! directories given on the command line are scanned last.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable that overrides the global scope root.
pub const HOME_ENV: &str = "SKILLGATE_HOME";

/// Global scope root used when no home can be determined.
const FALLBACK_HOME: &str = "/root";

/// Resolved scope roots for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConfig {
    /// Global scope root.
    pub home: PathBuf,
    /// Project scope root.
    pub project: PathBuf,
    /// Extra plugins directories (already pointing at plugin parents).
    pub extra_plugin_dirs: Vec<PathBuf>,
}

impl ScopeConfig {
    /// Resolve scopes from CLI options and the process environment.
    ///
    /// `project` falls back to the process working directory when absent
    /// or empty.
    pub fn resolve(
        home: Option<PathBuf>,
        project: Option<PathBuf>,
        extra_plugin_dirs: Vec<PathBuf>,
    ) -> Result<Self> {
        let home = resolve_home(home, |key| std::env::var_os(key));
        let project = match project.filter(|p| !p.as_os_str().is_empty()) {
            Some(p) => p,
            None => std::env::current_dir().context("failed to determine working directory")?,
        };

        tracing::debug!(
            home = %home.display(),
            project = %project.display(),
            extra = extra_plugin_dirs.len(),
            "scopes resolved"
        );

        Ok(Self {
            home,
            project,
            extra_plugin_dirs,
        })
    }

    /// Plugins directories in precedence order: global, project, extras.
    pub fn plugin_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = skillgate_rules::plugin_dirs(&[self.home.as_path(), self.project.as_path()]);
        dirs.extend(self.extra_plugin_dirs.iter().cloned());
        dirs
    }
}

/// Determine the global scope root.
///
/// Priority:
/// 1. explicit `--home`
/// 2. `$SKILLGATE_HOME`
/// 3. `$HOME`
/// 4. `$USERPROFILE`
/// 5. `/root`
pub fn resolve_home<F>(explicit: Option<PathBuf>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(home) = explicit {
        return home;
    }

    [HOME_ENV, "HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(FALLBACK_HOME).to_path_buf())
}
