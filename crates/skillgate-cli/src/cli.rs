//! CLI argument definitions for skillgate.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// skillgate -- prompt-time skill activation for Claude Code.
#[derive(Parser)]
#[command(
    name = "skillgate",
    version,
    about = "skillgate -- prompt-time skill activation for Claude Code",
    long_about = "Reads a UserPromptSubmit hook payload on stdin, matches the prompt against \
                  the skill rules shipped by installed plugins, and prints which skills \
                  should be used before responding."
)]
pub struct Cli {
    /// Defaults to `hook` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Global scope root (defaults to $SKILLGATE_HOME, then $HOME).
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Additional plugins directory, scanned after the project scope.
    /// May be repeated.
    #[arg(long = "plugins-dir", global = true, value_name = "DIR")]
    pub plugins_dirs: Vec<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as a hook: read the JSON payload from stdin and print the advisory.
    Hook,

    /// Evaluate a prompt given on the command line.
    Check {
        /// The prompt text to evaluate.
        prompt: String,

        /// Project directory (defaults to the current directory).
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Print matches as JSON instead of the advisory block.
        #[arg(long)]
        json: bool,
    },

    /// List the merged skill rules visible from a project.
    List {
        /// Project directory (defaults to the current directory).
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
}
