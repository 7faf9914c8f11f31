//! Core types and error handling for includegen.
//!
//! This module holds the foundation the rest of the crate builds on: the
//! typed error taxonomy for the one-shot transformation and the
//! user-friendly error presentation used by the CLI.
//!
//! # Design Principles
//!
//! - **Error first**: every fallible operation returns a [`Result`] carrying
//!   an [`IncludeGenError`] with enough context (path, role, key) to be
//!   actionable without a stack trace.
//! - **Terminal failures**: the generator transforms static files; nothing
//!   is retried and no partial output is ever produced.
//!
//! [`Result`]: std::result::Result

pub mod error;

pub use error::{user_friendly_error, ErrorContext, IncludeGenError};
