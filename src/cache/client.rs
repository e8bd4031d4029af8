//! Degrading client wrapper
//!
//! Presents the same operation surface as the underlying [`CacheStore`], but
//! optionally absorbs connectivity failures on read operations: the failure is
//! logged as a warning and the operation returns its miss value instead.
//! Write operations never degrade; a write failure must stay visible to the
//! caller.
//!
//! The interception is a single generic combinator (the miss value is the
//! return type's `Default`), so adding a read operation adds no new wrapping
//! code.

use super::errors::CacheResult;
use super::store::CacheStore;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// What to do when a read operation hits a connectivity failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailurePolicy {
    /// Propagate every failure unchanged
    Propagate,
    /// Absorb connectivity failures on reads: warn and return a miss
    DegradeToMiss,
}

impl ReadFailurePolicy {
    /// Derive the policy from the `degrade_on_failure` configuration flag
    pub fn from_flag(degrade_on_failure: bool) -> Self {
        if degrade_on_failure {
            Self::DegradeToMiss
        } else {
            Self::Propagate
        }
    }
}

/// Cache client that degrades read failures per its [`ReadFailurePolicy`].
///
/// With `Propagate` this is a pure pass-through. With `DegradeToMiss`, a
/// degraded cache behaves as if caching were disabled for the duration of the
/// outage: one warning per failed read, never a crash.
#[derive(Debug, Clone)]
pub struct DegradingClient<S> {
    store: S,
    policy: ReadFailurePolicy,
}

impl<S: CacheStore> DegradingClient<S> {
    pub fn new(store: S, policy: ReadFailurePolicy) -> Self {
        Self { store, policy }
    }

    /// Construct directly from the `degrade_on_failure` configuration flag
    pub fn from_flag(store: S, degrade_on_failure: bool) -> Self {
        Self::new(store, ReadFailurePolicy::from_flag(degrade_on_failure))
    }

    pub fn policy(&self) -> ReadFailurePolicy {
        self.policy
    }

    /// Access the wrapped store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a read operation, converting connectivity failures to the miss
    /// value when degradation is enabled. Protocol and value errors propagate
    /// unchanged.
    async fn read<T, F>(&self, operation: &'static str, fut: F) -> CacheResult<T>
    where
        T: Default,
        F: Future<Output = CacheResult<T>>,
    {
        match fut.await {
            Err(error)
                if self.policy == ReadFailurePolicy::DegradeToMiss
                    && error.is_connectivity() =>
            {
                warn!(
                    operation = operation,
                    error = %error,
                    "The cache backend is unreachable, treating read as a miss"
                );
                Ok(T::default())
            }
            other => other,
        }
    }

    // Read surface (degradable)

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.read("GET", self.store.get(key)).await
    }

    pub async fn hash_get_all(&self, key: &str) -> CacheResult<HashMap<String, String>> {
        self.read("HGETALL", self.store.hash_get_all(key)).await
    }

    pub async fn set_members(&self, key: &str) -> CacheResult<HashSet<String>> {
        self.read("SMEMBERS", self.store.set_members(key)).await
    }

    /// Health check degrades to unhealthy, never to an error
    pub async fn health_check(&self) -> CacheResult<bool> {
        self.read("PING", self.store.health_check()).await
    }

    // Write surface (always propagates)

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.store.set(key, value, ttl).await
    }

    pub async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> CacheResult<i64> {
        self.store.hash_increment(key, field, delta).await
    }

    pub async fn add_set_member(&self, key: &str, member: &str) -> CacheResult<bool> {
        self.store.add_set_member(key, member).await
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(
            ReadFailurePolicy::from_flag(true),
            ReadFailurePolicy::DegradeToMiss
        );
        assert_eq!(
            ReadFailurePolicy::from_flag(false),
            ReadFailurePolicy::Propagate
        );
    }
}
