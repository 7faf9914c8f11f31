//! Error handling for includegen
//!
//! This module provides the typed error taxonomy and user-friendly error
//! reporting for the fragment generator. The error system is designed around
//! two principles:
//! 1. **Strongly-typed errors** ([`IncludeGenError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! # Error Categories
//!
//! - **Input**: [`IncludeGenError::MissingInput`], [`IncludeGenError::YamlParse`],
//!   [`IncludeGenError::MalformedInput`]
//! - **Output**: [`IncludeGenError::WriteFailed`], [`IncludeGenError::Serialize`]
//! - **Fingerprint**: [`IncludeGenError::InvalidDigest`]
//!
//! All errors are terminal for a run. The inputs are static files, so nothing
//! is retried; `main` converts the failure with [`user_friendly_error`] and
//! exits non-zero.
//!
//! # Examples
//!
//! ```rust,no_run
//! use includegen::core::{IncludeGenError, user_friendly_error};
//!
//! fn load_something() -> Result<(), IncludeGenError> {
//!     Err(IncludeGenError::MissingInput {
//!         role: "include document".to_string(),
//!         path: "elements/include/ffmpeg.yml".to_string(),
//!     })
//! }
//!
//! if let Err(e) = load_something() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // Colored error with a suggestion
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for includegen operations.
///
/// Each variant represents one specific failure mode of the one-shot
/// transformation and carries enough context (paths, keys, roles) for the
/// message to be actionable on its own.
#[derive(Error, Debug)]
pub enum IncludeGenError {
    /// A source document is absent or unreadable.
    ///
    /// `role` identifies which of the two inputs failed ("include document"
    /// or "element document") so the message distinguishes them even when
    /// both live in the same tree.
    #[error("{role} '{path}' not found or unreadable")]
    MissingInput {
        /// Which input failed ("include document" or "element document")
        role: String,
        /// The path that could not be read
        path: String,
    },

    /// A required key is absent from a source document, or has the wrong shape.
    ///
    /// The original tooling crashed ungracefully on this case; here it is a
    /// typed error naming the offending document and key.
    #[error("{role} '{path}' is malformed: missing or invalid key '{key}'")]
    MalformedInput {
        /// Which input is malformed
        role: String,
        /// Path of the malformed document
        path: String,
        /// The key that is missing or has an unexpected shape
        key: String,
    },

    /// A source document is not valid YAML, or its top level is not a mapping.
    #[error("invalid YAML in '{path}': {reason}")]
    YamlParse {
        /// Path of the document that failed to parse
        path: String,
        /// Parser diagnostics
        reason: String,
    },

    /// The transformed document could not be serialized back to YAML.
    #[error("failed to serialize output document: {reason}")]
    Serialize {
        /// Serializer diagnostics
        reason: String,
    },

    /// The destination file could not be written.
    #[error("unable to create '{path}': {reason}")]
    WriteFailed {
        /// The destination path
        path: String,
        /// Underlying write failure
        reason: String,
    },

    /// The host-provided content digest is not valid hexadecimal.
    #[error("invalid content digest '{digest}': {reason}")]
    InvalidDigest {
        /// The digest string as given on the command line
        digest: String,
        /// Decoder diagnostics
        reason: String,
    },

    /// IO error from the standard library.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl Clone for IncludeGenError {
    fn clone(&self) -> Self {
        match self {
            Self::MissingInput { role, path } => Self::MissingInput {
                role: role.clone(),
                path: path.clone(),
            },
            Self::MalformedInput { role, path, key } => Self::MalformedInput {
                role: role.clone(),
                path: path.clone(),
                key: key.clone(),
            },
            Self::YamlParse { path, reason } => Self::YamlParse {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::Serialize { reason } => Self::Serialize {
                reason: reason.clone(),
            },
            Self::WriteFailed { path, reason } => Self::WriteFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InvalidDigest { digest, reason } => Self::InvalidDigest {
                digest: digest.clone(),
                reason: reason.clone(),
            },
            // io::Error does not implement Clone
            Self::Io(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::Other { message } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// `ErrorContext` wraps an [`IncludeGenError`] and adds optional details and
/// a suggestion for resolution. When displayed, errors show:
/// 1. **Error**: the main message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable resolution steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: IncludeGenError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no additional information attached.
    #[must_use]
    pub const fn new(error: IncludeGenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions.
///
/// This is the main entry point for converting arbitrary errors into
/// user-friendly messages for CLI display. It recognizes [`IncludeGenError`]
/// variants and common IO errors and attaches tailored suggestions; anything
/// else is rendered with its full error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(gen_error) = error.downcast_ref::<IncludeGenError>() {
        return create_error_context(gen_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(IncludeGenError::Other {
                    message: format!("permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership and permissions on the staged tree")
                .with_details(
                    "includegen needs read access to both source documents and write access \
                     to the output directory",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(IncludeGenError::Other {
                    message: format!("file not found: {io_error}"),
                })
                .with_suggestion(
                    "Check that the path exists and --directory points at the staged tree",
                );
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(IncludeGenError::Other { message })
}

/// Create an appropriate [`ErrorContext`] for each [`IncludeGenError`] variant.
///
/// Suggestions focus on actionable steps rather than internals: most failures
/// here mean the staged Freedesktop SDK tree does not look the way the
/// generator expects it to.
fn create_error_context(error: IncludeGenError) -> ErrorContext {
    match &error {
        IncludeGenError::MissingInput { role, .. } => {
            let role = role.clone();
            ErrorContext::new(error)
                .with_suggestion(
                    "Check that the junction checkout is fully staged and --directory points \
                     at the root of the Freedesktop SDK tree",
                )
                .with_details(format!(
                    "The {role} must exist before the fragment can be generated"
                ))
        }
        IncludeGenError::MalformedInput { key, .. } => {
            let key = key.clone();
            ErrorContext::new(error).with_suggestion(format!(
                "Inspect the document and restore the '{key}' key; the upstream schema \
                 always carries it"
            ))
        }
        IncludeGenError::YamlParse { .. } => ErrorContext::new(error)
            .with_suggestion("Validate the document with a YAML linter")
            .with_details("Both inputs must be YAML documents with a mapping at the top level"),
        IncludeGenError::Serialize { .. } => ErrorContext::new(error)
            .with_suggestion("Re-run with --verbose to see which document section failed"),
        IncludeGenError::WriteFailed { path, .. } => {
            let path = path.clone();
            ErrorContext::new(error)
                .with_suggestion("Check permissions and free space on the destination directory")
                .with_details(format!(
                    "The fragment is written atomically; '{path}' was left untouched"
                ))
        }
        IncludeGenError::InvalidDigest { .. } => ErrorContext::new(error).with_suggestion(
            "Pass the host content digest as plain hexadecimal, e.g. --digest a1b2c3",
        ),
        _ => ErrorContext::new(error),
    }
}
