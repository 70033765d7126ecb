//! Error types for Astrolabe operations.
//!
//! Problems in a diagram are never errors: they are diagnostics inside a
//! [`ValidationResult`](astrolabe_parser::ValidationResult). [`AstrolabeError`]
//! covers the failures around validation, such as unreadable input.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for Astrolabe operations.
#[derive(Debug, Error)]
pub enum AstrolabeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read `{}`: {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },
}

impl AstrolabeError {
    /// Create a `ReadFile` error for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }
}
