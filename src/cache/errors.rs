//! Cache error types

use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// The connectivity class (`ConnectionError`, `Timeout`) is the only class
/// eligible for read-path degradation; protocol-level and value-level errors
/// always propagate.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to reach the cache backend
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// Cache operation timed out
    #[error("Cache operation timed out: {0}")]
    Timeout(String),

    /// Backend answered, but with a protocol or command-level error
    #[error("Cache response error: {0}")]
    ResponseError(String),

    /// Stored value could not be converted to the expected type
    #[error("Cache serialization error: {0}")]
    SerializationError(String),
}

impl CacheError {
    /// Whether this error is a transport/connectivity failure.
    ///
    /// Only connectivity failures may be absorbed by the degrading client.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::Timeout(_))
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
