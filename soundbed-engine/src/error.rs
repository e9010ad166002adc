//! Error types for soundbed-engine
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Playback failures are surfaced as errors to the caller and
//! logged; they never abort the embedding application.

use thiserror::Error;

/// Main error type for soundbed-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown clip group id on a play request
    #[error("Unknown clip group: {0}")]
    GroupNotFound(String),

    /// Unknown volume group id on a level change
    #[error("Unknown volume group: {0}")]
    UnknownVolumeGroup(String),

    /// Clip group configured with zero clip variants
    #[error("Clip group '{0}' has no clips")]
    EmptyGroup(String),

    /// Audio backend failure (instance creation, anchoring)
    #[error("Audio backend error: {0}")]
    Backend(String),

    /// Manifest loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference store errors
    #[error("Preference store error: {0}")]
    Settings(#[from] soundbed_common::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using soundbed-engine Error
pub type Result<T> = std::result::Result<T, Error>;
