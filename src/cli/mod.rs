//! Command-line interface for includegen.
//!
//! Each command is implemented as a separate module with its own argument
//! structure and execution logic:
//!
//! - `generate` - Generate the derived include fragment from the staged tree
//! - `fingerprint` - Derive the staging cache key for the host build tool
//!
//! # Global Options
//!
//! All commands support:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//!
//! # Example
//!
//! ```bash
//! # Generate with the Freedesktop SDK tree layout defaults
//! includegen generate --directory ./staged
//!
//! # Explicit paths and a different junction element
//! includegen generate \
//!     --include elements/include/ffmpeg.yml \
//!     --element elements/components/ffmpeg.bst \
//!     --out elements/include/ffmpeg-custom.yml \
//!     --junction freedesktop-sdk.bst
//!
//! # Cache key for the host's staging phase
//! includegen fingerprint --out elements/include/ffmpeg-custom.yml --digest a1b2c3
//! ```

mod fingerprint;
mod generate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Main CLI application structure for includegen.
///
/// Handles the global verbosity flags and delegates to subcommands for the
/// actual work. Logging is initialized once, before dispatch, from the
/// verbosity flags (or `RUST_LOG` when set explicitly).
#[derive(Parser)]
#[command(
    name = "includegen",
    about = "Generate a junction-qualified FFmpeg include fragment from Freedesktop SDK build definitions",
    version,
    long_about = "includegen reads the Freedesktop SDK FFmpeg include and element documents from \
                  a staged build-definition tree and generates one merged, junction-qualified \
                  include fragment for downstream FFmpeg builds."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Shows each transformation step, including keys that were tolerated as
    /// absent. Equivalent to `RUST_LOG=debug`. Mutually exclusive with
    /// `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors for automation.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands for the includegen CLI.
#[derive(Subcommand)]
enum Commands {
    /// Generate the derived include fragment.
    ///
    /// Reads the include and element documents, applies the dependency
    /// qualification and variable merge, and writes the fragment atomically.
    ///
    /// See [`generate::GenerateCommand`] for detailed options and behavior.
    Generate(generate::GenerateCommand),

    /// Derive the staging cache key for the host build tool.
    ///
    /// Prints a SHA-256 fingerprint over the generator version, the output
    /// path, and the host-provided content digest.
    ///
    /// See [`fingerprint::FingerprintCommand`] for detailed options.
    Fingerprint(fingerprint::FingerprintCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// Initializes logging from the verbosity flags, then dispatches to the
    /// subcommand's `execute()`.
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Generate(cmd) => cmd.execute(self.quiet),
            Commands::Fingerprint(cmd) => cmd.execute(),
        }
    }

    /// Initialize the tracing subscriber.
    ///
    /// An explicit `RUST_LOG` wins; otherwise `--verbose` maps to debug,
    /// `--quiet` to errors only, and the default is info. Initialization is
    /// best-effort so tests driving the CLI in-process don't panic on a
    /// second init.
    fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let default_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
