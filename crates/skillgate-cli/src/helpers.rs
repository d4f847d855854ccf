//! Shared helper functions used across CLI subcommands.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Output goes to stderr; stdout is reserved for the advisory report.
/// Colours are only used when stderr is a terminal.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Panic handling
// ---------------------------------------------------------------------------

/// Install a panic hook that reports the panic on stderr and exits with
/// status 1 instead of aborting.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        eprintln!("skillgate: uncaught panic at {location}: {payload}");
        std::process::exit(1);
    }));
}
