//! Unified error types for the trafficstat workspace.
//!
//! Every failure a query can hit maps onto one of these variants. The query
//! layer collapses all of them into [`UNKNOWN`](crate::types::UNKNOWN) before
//! anything crosses the service boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum TrafficStatError {
    /// The primary counter source cannot answer for this key.
    #[error("counters unavailable for {key}: {reason}")]
    Unavailable {
        /// Key that was queried.
        key: String,
        /// Why the source could not answer.
        reason: String,
    },

    /// A legacy table could not be opened, read, or released.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A query key was malformed.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected input.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl TrafficStatError {
    /// Builds an [`Unavailable`](Self::Unavailable) error for `key`.
    pub fn unavailable(key: impl ToString, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TrafficStatError>;
