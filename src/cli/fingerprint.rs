//! Derive the staging cache key for the host build tool.
//!
//! The host's content cache decides whether to regenerate the fragment based
//! on this key. It changes whenever the generator version, the output path,
//! or the host's digest over the staged inputs changes.
//!
//! ```bash
//! includegen fingerprint --out elements/include/ffmpeg-custom.yml --digest a1b2c3
//! ```

use crate::constants::DEFAULT_OUTPUT_PATH;
use crate::fingerprint::unique_key;
use anyhow::Result;
use clap::Args;

/// Command to print the staging cache fingerprint.
#[derive(Args)]
pub struct FingerprintCommand {
    /// Destination path of the generated fragment
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    out: String,

    /// Content digest provided by the host, as hexadecimal
    ///
    /// Omit when running outside a host; the key then covers only the
    /// generator version and output path.
    #[arg(long)]
    digest: Option<String>,
}

impl FingerprintCommand {
    /// Execute the fingerprint command, printing the key to stdout.
    pub fn execute(self) -> Result<()> {
        let key = unique_key(&self.out, self.digest.as_deref())?;
        println!("{key}");
        Ok(())
    }
}
