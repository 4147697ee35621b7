//! Error types for Stash core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Stash operations.
pub type Result<T> = std::result::Result<T, StashError>;

/// Core error type for Stash operations.
#[derive(Debug, Error)]
pub enum StashError {
    /// Presented token is missing, malformed, expired, or forged
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Login passphrase does not match the stored owner verifier
    #[error("Invalid credentials")]
    InvalidCredential,

    /// Second registration attempt against an already-registered vault
    #[error("Vault is already registered")]
    AlreadyRegistered,

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Key derivation, hashing, or random source error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for StashError {
    fn from(err: std::io::Error) -> Self {
        StashError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for StashError {
    fn from(err: serde_json::Error) -> Self {
        StashError::Validation(err.to_string())
    }
}
