//! includegen - Freedesktop SDK FFmpeg include fragment generator
//!
//! A small build-system companion tool that generates a derived
//! configuration fragment by merging and filtering two YAML documents from a
//! Freedesktop SDK build-definition tree. It reads the FFmpeg include
//! document and the base FFmpeg element document, and produces a single
//! junction-qualified include that downstream projects use as the base for
//! their own FFmpeg builds.
//!
//! # What the transformation does
//!
//! - **Dependency qualification**: every dependency identifier from the
//!   include document is rewritten to `"<junction>:<dep>"` so it resolves
//!   through the junction element.
//! - **Variable pruning**: variables that only referenced removed variables
//!   (`ffmpeg-prefix`, `ffmpeg-libdir`, `ffmpeg-arch`) are dropped, and
//!   `conf-local` is scrubbed of the flags that used them.
//! - **Section removal**: `sources`, `config`, `public.cpe`, and
//!   `public.bst.split-rules` are removed because the consumer supplies its
//!   own; an emptied `public` section collapses away entirely.
//! - **Element merge**: dependencies appended through the element's `(>)`
//!   lists are appended junction-qualified, and the element's variables are
//!   copied under a `fdo-` prefix, with encoder/decoder lists and
//!   `conf-extra` cleaned of embedded `%{...}` references.
//!
//! The output preserves the key order of the include document. Generation
//! is deterministic but explicitly one-shot: running it over its own output
//! would double-qualify dependencies.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`generate`, `fingerprint`)
//! - [`core`] - Typed errors and user-friendly error reporting
//! - [`document`] - Ordered YAML document loading and storing
//! - [`generator`] - The fragment transformation pipeline
//! - [`fingerprint`] - Staging cache-key derivation for the host build tool
//! - [`utils`] - Atomic file writes and IO helpers
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Generate against a staged tree with the standard layout
//! includegen generate --directory ./staged
//!
//! # Explicit paths and junction
//! includegen generate \
//!     --include elements/include/ffmpeg.yml \
//!     --element elements/components/ffmpeg.bst \
//!     --out elements/include/ffmpeg-custom.yml \
//!     --junction freedesktop-sdk.bst
//!
//! # Cache key for the host's staging phase
//! includegen fingerprint --out elements/include/ffmpeg-custom.yml --digest <hex>
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use includegen::document::{store_document, LoadedDocument};
//! use includegen::generator::{FragmentGenerator, ELEMENT_ROLE, INCLUDE_ROLE};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let include = LoadedDocument::load(Path::new("elements/include/ffmpeg.yml"), INCLUDE_ROLE)?;
//! let element = LoadedDocument::load(Path::new("elements/components/ffmpeg.bst"), ELEMENT_ROLE)?;
//!
//! let generator = FragmentGenerator::new("freedesktop-sdk.bst");
//! let output = generator.generate(include, &element)?;
//!
//! store_document(Path::new("elements/include/ffmpeg-custom.yml"), &output)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod document;
pub mod fingerprint;
pub mod generator;
pub mod utils;
