//! Shared utilities for includegen.

pub mod fs;
