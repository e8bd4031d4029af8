//! Shared test infrastructure: a scriptable in-memory cache store.

use modelcache_core::cache::{CacheError, CacheResult, CacheStore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    strings: HashMap<String, String>,
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, HashSet<String>>,
    /// Every operation fails with a connection error
    unreachable: bool,
    /// Operations on keys with these prefixes fail with a connection error
    unreachable_prefixes: Vec<String>,
    /// Operations on these keys fail with a protocol-level response error
    response_error_keys: HashSet<String>,
    /// Commands attempted against the store, for write-propagation assertions
    command_log: Vec<String>,
}

/// In-memory [`CacheStore`] with scriptable failures.
///
/// Clones share state, so a test can keep a handle to flip failure modes
/// while the client under test holds another.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .strings
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_hash(self, key: &str, entries: &[(&str, &str)]) -> Self {
        self.state.lock().unwrap().hashes.insert(
            key.to_string(),
            entries
                .iter()
                .map(|(field, value)| (field.to_string(), value.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_set(self, key: &str, members: &[&str]) -> Self {
        self.state.lock().unwrap().sets.insert(
            key.to_string(),
            members.iter().map(|member| member.to_string()).collect(),
        );
        self
    }

    /// Make every operation fail with a connection error
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Make operations on keys starting with `prefix` fail with a connection
    /// error (per-type outage simulation)
    pub fn fail_keys_with_prefix(&self, prefix: &str) {
        self.state
            .lock()
            .unwrap()
            .unreachable_prefixes
            .push(prefix.to_string());
    }

    /// Make operations on `key` fail with a protocol-level response error
    pub fn respond_error_on(&self, key: &str) {
        self.state
            .lock()
            .unwrap()
            .response_error_keys
            .insert(key.to_string());
    }

    /// Commands attempted so far (including ones that failed)
    pub fn command_log(&self) -> Vec<String> {
        self.state.lock().unwrap().command_log.clone()
    }

    fn check_and_log(&self, command: &str, key: &str) -> CacheResult<()> {
        let mut state = self.state.lock().unwrap();
        state.command_log.push(format!("{command} {key}"));

        if state.unreachable
            || state
                .unreachable_prefixes
                .iter()
                .any(|prefix| key.starts_with(prefix))
        {
            return Err(CacheError::ConnectionError(format!(
                "mock backend unreachable for {key}"
            )));
        }
        if state.response_error_keys.contains(key) {
            return Err(CacheError::ResponseError(format!(
                "mock protocol error for {key}"
            )));
        }
        Ok(())
    }
}

impl CacheStore for MockStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.check_and_log("GET", key)?;
        Ok(self.state.lock().unwrap().strings.get(key).cloned())
    }

    async fn hash_get_all(&self, key: &str) -> CacheResult<HashMap<String, String>> {
        self.check_and_log("HGETALL", key)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .hashes
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_members(&self, key: &str) -> CacheResult<HashSet<String>> {
        self.check_and_log("SMEMBERS", key)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .sets
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        self.check_and_log("PING", "-")?;
        Ok(true)
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> CacheResult<()> {
        self.check_and_log("SETEX", key)?;
        self.state
            .lock()
            .unwrap()
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> CacheResult<i64> {
        self.check_and_log("HINCRBY", key)?;
        let mut state = self.state.lock().unwrap();
        let entry = state
            .hashes
            .entry(key.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(|| "0".to_string());
        let updated = entry.parse::<i64>().unwrap_or(0) + delta;
        *entry = updated.to_string();
        Ok(updated)
    }

    async fn add_set_member(&self, key: &str, member: &str) -> CacheResult<bool> {
        self.check_and_log("SADD", key)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.check_and_log("DEL", key)?;
        let mut state = self.state.lock().unwrap();
        state.strings.remove(key);
        state.hashes.remove(key);
        state.sets.remove(key);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "mock"
    }
}
