//! Generate the derived include fragment from a staged build-definition tree.
//!
//! This module provides the `generate` command, the one-shot transformation
//! the tool exists for: read the Freedesktop SDK FFmpeg include and element
//! documents, merge and filter them, and write the junction-qualified
//! fragment.
//!
//! # Examples
//!
//! Generate against a staged tree with the standard layout:
//! ```bash
//! includegen generate --directory ./staged
//! ```
//!
//! Override individual paths (relative paths resolve under `--directory`,
//! absolute paths are used as-is):
//! ```bash
//! includegen generate --out /tmp/ffmpeg-custom.yml --junction my-sdk.bst
//! ```
//!
//! # Error Conditions
//!
//! - Either source document absent or unreadable
//! - A required key (`variables`, `build-depends`, `depends`) missing
//! - The destination not writable
//!
//! On any failure the destination file is not created or modified.

use crate::constants::{
    DEFAULT_ELEMENT_PATH, DEFAULT_INCLUDE_PATH, DEFAULT_JUNCTION, DEFAULT_OUTPUT_PATH,
};
use crate::generator::generate_file;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Command to generate the derived include fragment.
///
/// The transformation is single-pass and not idempotent: it expects fresh,
/// unqualified input documents. Re-running over its own output would
/// double-qualify every dependency.
#[derive(Args)]
pub struct GenerateCommand {
    /// Root of the staged build-definition tree
    ///
    /// Relative document paths resolve under this directory.
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// Path of the include document
    #[arg(long, default_value = DEFAULT_INCLUDE_PATH)]
    include: PathBuf,

    /// Path of the element document
    #[arg(long, default_value = DEFAULT_ELEMENT_PATH)]
    element: PathBuf,

    /// Destination path of the generated fragment
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    out: PathBuf,

    /// Junction name used to qualify dependency identifiers
    #[arg(short, long, default_value = DEFAULT_JUNCTION)]
    junction: String,
}

impl GenerateCommand {
    /// Execute the generate command.
    ///
    /// Loads both documents, runs the transformation, and writes the
    /// fragment atomically. Prints a one-line summary unless `quiet`.
    pub fn execute(self, quiet: bool) -> Result<()> {
        // Path::join keeps absolute overrides intact
        let include_path = self.directory.join(&self.include);
        let element_path = self.directory.join(&self.element);
        let out_path = self.directory.join(&self.out);

        tracing::info!(
            "generating '{}' from '{}' and '{}'",
            out_path.display(),
            include_path.display(),
            element_path.display()
        );

        generate_file(&include_path, &element_path, &out_path, &self.junction)?;

        if !quiet {
            println!(
                "{} Generated {}",
                "✓".green().bold(),
                out_path.display().to_string().bold()
            );
        }

        Ok(())
    }
}
