//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Channel label outside the supported payment rails
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Status label outside APPROVED/REVIEW/BLOCKED
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
