//! Port traits for infrastructure boundaries.
//!
//! The import pipeline itself is pure. Ports exist for:
//! - Loading raw documents (could swap a local directory for a remote repository)
//! - Recording diagnostics about items the pipeline could not classify
//! - Clock (for testing)

use std::path::PathBuf;

use async_trait::async_trait;
use bestiary_domain::ItemKind;
use chrono::{DateTime, Utc};
use serde_json::Value;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised while listing or fetching raw documents.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Index file not found at {0}")]
    IndexNotFound(String),
    #[error("Data file not found: {0}")]
    DataFileNotFound(PathBuf),
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),
    #[error("Remote request failed: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Remote(err.to_string())
    }
}

// =============================================================================
// Diagnostics Port
// =============================================================================

/// Append-only sink for item-level data quality diagnostics.
///
/// Shared by every parse running in parallel, so implementations must accept
/// concurrent `record` calls through a shared reference.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticsSink: Send + Sync {
    /// Record one diagnostic: the kind of the offending record, the raw record
    /// (or a synthetic fragment describing it) and a human readable reason.
    fn record(&self, kind: &ItemKind, fragment: &Value, reason: &str);
}

// =============================================================================
// Document Source Port
// =============================================================================

/// Supplies raw creature documents by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Names of every document the source can supply.
    async fn list(&self) -> Result<Vec<String>, SourceError>;

    /// Fetch one decoded document.
    async fn fetch(&self, name: &str) -> Result<Value, SourceError>;

    /// Human readable location, for logs.
    fn describe(&self) -> String;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
