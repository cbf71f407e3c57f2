//! # Ginfo CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file only
//! sets up logging and terminal colors, invokes `cli::run()` and handles process
//! termination.
//!
//! Diagnostics are written to stderr through `env_logger`; set `GINFO_LOG` (for
//! example `GINFO_LOG=debug`) to see more than warnings.

use env_logger::Env;
use std::io::IsTerminal;

mod cli;

fn main() {
    env_logger::Builder::from_env(Env::default().filter_or("GINFO_LOG", "warn"))
        .format_timestamp(None)
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
