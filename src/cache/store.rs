//! Cache store trait definition

use super::errors::CacheResult;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

/// Trait defining the underlying key-value store operations.
///
/// Implemented by concrete backends (Redis in production, an in-memory mock in
/// tests). All operations are async and return `CacheResult` for error
/// handling. Connectivity failures must surface as the connectivity error
/// class so the degrading client can distinguish them from protocol errors.
pub trait CacheStore: Send + Sync {
    /// Get a string value by key
    ///
    /// Returns `Ok(Some(value))` on cache hit, `Ok(None)` on cache miss.
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<String>>> + Send;

    /// Get all field/value pairs of a hash key (empty map when absent)
    fn hash_get_all(
        &self,
        key: &str,
    ) -> impl Future<Output = CacheResult<HashMap<String, String>>> + Send;

    /// Get all members of a set key (empty set when absent)
    fn set_members(&self, key: &str) -> impl Future<Output = CacheResult<HashSet<String>>> + Send;

    /// Check if the cache backend is reachable and healthy
    fn health_check(&self) -> impl Future<Output = CacheResult<bool>> + Send;

    /// Set a string value with a TTL
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    /// Increment a hash field by `delta`, returning the new value
    fn hash_increment(
        &self,
        key: &str,
        field: &str,
        delta: i64,
    ) -> impl Future<Output = CacheResult<i64>> + Send;

    /// Add a member to a set, returning whether it was newly added
    fn add_set_member(
        &self,
        key: &str,
        member: &str,
    ) -> impl Future<Output = CacheResult<bool>> + Send;

    /// Delete a key
    fn delete(&self, key: &str) -> impl Future<Output = CacheResult<()>> + Send;

    /// Get the name of the store backend
    fn store_name(&self) -> &'static str;
}
