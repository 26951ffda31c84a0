//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`MigrationError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use library_migrator::error::{Result, ResultExt};
//!
//! fn open_log(path: &Path) -> Result<FailureRecorder> {
//!     FailureRecorder::open_append(path).with_context("opening failure log")
//! }
//! ```

use crate::config::ConfigError;
use crate::migration::{DestinationError, MigrationError, SourceError};

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source catalog error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Destination catalog error
    #[error("Destination error: {0}")]
    Destination(#[from] DestinationError),

    /// Migration aborted
    #[error("Migration aborted: {0}")]
    Migration(#[from] MigrationError),

    /// One or more collections could not be migrated
    #[error("{failed} collection(s) could not be migrated: {names}")]
    CollectionsFailed { failed: usize, names: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a collections-failed error from the failed collection names.
    pub fn collections_failed(names: &[&str]) -> Self {
        Self::CollectionsFailed {
            failed: names.len(),
            names: names.join(", "),
        }
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Config(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, DestinationError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Destination(e).context(ctx))
    }
}
