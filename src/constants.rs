//! Global constants used throughout the includegen codebase.
//!
//! This module contains the default Freedesktop SDK tree paths, the default
//! junction name, and the fixed variable/flag lists driven by the fragment
//! transformation. Defining them centrally keeps the generator pipeline free
//! of magic strings and makes the schema assumptions discoverable.

/// Default junction name used to qualify dependency identifiers.
///
/// Dependencies taken from the Freedesktop SDK tree are rewritten to
/// `"<junction>:<dep>"` so the generated include resolves them through the
/// junction element rather than the local project.
pub const DEFAULT_JUNCTION: &str = "freedesktop-sdk.bst";

/// Default path of the include document, relative to the staged SDK tree.
pub const DEFAULT_INCLUDE_PATH: &str = "elements/include/ffmpeg.yml";

/// Default path of the element document, relative to the staged SDK tree.
pub const DEFAULT_ELEMENT_PATH: &str = "elements/components/ffmpeg.bst";

/// Default path of the generated fragment, relative to the staged SDK tree.
pub const DEFAULT_OUTPUT_PATH: &str = "elements/include/ffmpeg-custom.yml";

/// Include variables defined purely in terms of other removed variables.
///
/// `"(?)"` is a pass-through placeholder token from the source schema, kept
/// here verbatim because it appears as a literal mapping key.
pub const PRUNED_VARIABLES: &[&str] = &["ffmpeg-prefix", "ffmpeg-libdir", "ffmpeg-arch", "(?)"];

/// `conf-local` tokens dropped because they reference removed variables.
///
/// Matching is by prefix: `--prefix="%{ffmpeg-prefix}"` and friends all go.
pub const STRIPPED_CONF_PREFIXES: &[&str] = &["--prefix", "--libdir", "--arch"];

/// Prefix applied to element variables copied into the generated include.
pub const FDO_VARIABLE_PREFIX: &str = "fdo-";

/// The element schema's "append after existing entries" list marker.
pub const APPEND_MARKER: &str = "(>)";

/// Dependency kinds carried by both documents, in processing order.
pub const DEPENDENCY_KINDS: &[&str] = &["build-depends", "depends"];
