//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Risk level label not recognised
    #[error("Unknown risk level: {0}")]
    UnknownRiskLevel(String),

    /// Transaction status label not recognised
    #[error("Unknown transaction status: {0}")]
    UnknownStatus(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transcript missing or unusable
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
