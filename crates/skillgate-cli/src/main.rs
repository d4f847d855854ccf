//! CLI entry point for skillgate.
//!
//! The `skillgate` binary runs as a Claude Code `UserPromptSubmit` hook:
//! it reads the hook payload from stdin, matches the prompt against the
//! skill rules of every installed plugin, and prints an advisory naming the
//! skills to use.  Nothing is printed when no skill matches.
//!
//! Exit status is 0 on success (with or without an advisory) and 1 on any
//! fatal error; diagnostics go to stderr.

mod cli;
mod config;
mod helpers;
mod hook;
mod input;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use skillgate_kernel::{SkillMatcher, render_json};

use crate::cli::{Cli, Commands};
use crate::config::ScopeConfig;
use crate::input::HookInput;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    helpers::init_tracing(&cli.log_level);
    helpers::install_panic_hook();

    let Cli {
        command,
        home,
        plugins_dirs,
        ..
    } = cli;

    let result = match command.unwrap_or(Commands::Hook) {
        Commands::Hook => cmd_hook(home, plugins_dirs),
        Commands::Check { prompt, cwd, json } => cmd_check(home, plugins_dirs, cwd, &prompt, json),
        Commands::List { cwd } => cmd_list(home, plugins_dirs, cwd),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("skillgate: skill activation check failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand: hook
// ---------------------------------------------------------------------------

fn cmd_hook(home: Option<PathBuf>, plugins_dirs: Vec<PathBuf>) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read hook payload from stdin")?;

    let input = HookInput::parse(&raw)?;
    let config = ScopeConfig::resolve(home, input.cwd, plugins_dirs)?;

    if let Some(report) = hook::advise(&config, &input.prompt) {
        println!("{report}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: check
// ---------------------------------------------------------------------------

fn cmd_check(
    home: Option<PathBuf>,
    plugins_dirs: Vec<PathBuf>,
    cwd: Option<PathBuf>,
    prompt: &str,
    json: bool,
) -> Result<()> {
    let config = ScopeConfig::resolve(home, cwd, plugins_dirs)?;

    if !json {
        match hook::advise(&config, prompt) {
            Some(report) => println!("{report}"),
            None => eprintln!("No skills matched."),
        }
        return Ok(());
    }

    let rules = hook::load_rules(&config);
    let matcher = SkillMatcher::new(&rules);
    let matches = matcher.evaluate(prompt);
    println!("{}", render_json(&matches)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: list
// ---------------------------------------------------------------------------

fn cmd_list(home: Option<PathBuf>, plugins_dirs: Vec<PathBuf>, cwd: Option<PathBuf>) -> Result<()> {
    let config = ScopeConfig::resolve(home, cwd, plugins_dirs)?;
    let rules = hook::load_rules(&config);

    if rules.is_empty() {
        println!("No skill rules found.");
        println!("Searched:");
        for dir in config.plugin_dirs() {
            println!("  {}", dir.display());
        }
        return Ok(());
    }

    println!("{} skill(s):\n", rules.len());
    for skill in &rules {
        let (keywords, patterns) = skill
            .rule
            .prompt_triggers
            .as_ref()
            .map(|t| (t.keywords().len(), t.intent_patterns().len()))
            .unwrap_or((0, 0));

        println!(
            "  {:<32} {:<8} {:<8} {:<9} {} keyword(s), {} pattern(s)  [{}]",
            skill.name,
            skill.rule.priority,
            skill.rule.enforcement,
            skill.rule.kind,
            keywords,
            patterns,
            skill.source.plugin,
        );
        if let Some(description) = &skill.rule.description {
            println!("      {description}");
        }
    }

    // Surface patterns that would never match.
    for diagnostic in SkillMatcher::new(&rules).diagnostics() {
        println!("\n  warning: {diagnostic}");
    }

    Ok(())
}
