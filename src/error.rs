//! Error types for a3s-pii

use crate::types::PiiCategory;
use thiserror::Error;

/// Errors that can occur while building a PII engine
///
/// Detection and redaction themselves never fail; every variant here is
/// raised at construction time so a misconfigured engine is never used.
#[derive(Debug, Error)]
pub enum PiiError {
    /// A detector pattern failed to compile or cannot be overridden
    #[error("Invalid pattern for category '{category}': {reason}")]
    InvalidPattern {
        category: PiiCategory,
        reason: String,
    },

    /// Name dictionary missing, unreadable, malformed or empty
    #[error("Name dictionary error: {0}")]
    Dictionary(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for PII engine operations
pub type Result<T> = std::result::Result<T, PiiError>;
