//! includegen CLI entry point
//!
//! This is the main executable for the include fragment generator. It
//! handles command-line argument parsing, error display, and command
//! execution:
//! - `generate` - generate the derived include fragment from a staged tree
//! - `fingerprint` - derive the staging cache key for the host build tool

use anyhow::Result;
use clap::Parser;
use includegen::cli;
use includegen::core::error::user_friendly_error;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
