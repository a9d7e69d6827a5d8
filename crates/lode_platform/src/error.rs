//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The host cannot report the requested signal at all
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// The host reported a value that could not be interpreted
    #[error("Invalid platform value for {property}: {value:?}")]
    InvalidValue {
        /// Property that was queried
        property: String,
        /// Raw value as reported by the host
        value: String,
    },

    /// Failed to read an asset manifest
    #[error("Asset manifest error: {0}")]
    Manifest(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
