//! CLI entry point for the test file splitter.

use std::io::IsTerminal;

use test_splitter::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // WARN by default so range diagnostics surface, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
