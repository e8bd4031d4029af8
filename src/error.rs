//! Error types for the ModelCache core.

use crate::cache::CacheError;
use crate::config::ConfigurationError;
use thiserror::Error;

/// Crate-level error umbrella.
///
/// Components keep their own error enums ([`ConfigurationError`],
/// [`CacheError`]); this type exists for callers that want a single error
/// surface across the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelCacheError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<ConfigurationError> for ModelCacheError {
    fn from(error: ConfigurationError) -> Self {
        ModelCacheError::ConfigurationError(error.to_string())
    }
}

impl From<CacheError> for ModelCacheError {
    fn from(error: CacheError) -> Self {
        ModelCacheError::CacheError(error.to_string())
    }
}

/// Result type for crate-level operations
pub type Result<T> = std::result::Result<T, ModelCacheError>;
