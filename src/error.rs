//! Error types for pagecoop
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CoopError
pub type Result<T> = std::result::Result<T, CoopError>;

/// Unified error type for pagecoop operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoopError {
    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    /// Size/width/endianness inconsistency or empty input.
    /// Fix the arguments; retrying unchanged fails the same way.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    // -------------------------------------------------------------------------
    // Invariant Errors
    // -------------------------------------------------------------------------
    /// A load scan handed to composition was overlapping or out of order.
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoopError {
    /// True for errors that indicate corrupted page-store state rather than
    /// bad arguments.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoopError::InternalInvariant(_))
    }
}
