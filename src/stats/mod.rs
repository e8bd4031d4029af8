//! # Stats Aggregation Module
//!
//! Folds the raw hit/miss/invalidation counters kept in the store into a
//! per-type and global [`StatsReport`] for a presentation layer to render.
//!
//! ## Persisted counter layout (preserved for compatibility)
//!
//! - membership set `stats_models` lists participating type keys;
//! - per-(type, kind) counters are hashes at `cache_stats:{type_key}:{index}`
//!   with kind indices `uncached = 0`, `cached = 1`, `invalidated = 2`.
//!
//! All reads go through the [`DegradingClient`]; with degradation enabled an
//! unreachable backend zero-fills the affected counters instead of failing
//! the report.

use crate::cache::{CacheError, CacheResult, CacheStore, DegradingClient};
use crate::profile::TypeKey;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Store key of the set listing type keys that have recorded stats
pub const MEMBERSHIP_KEY: &str = "stats_models";

/// Classification of a recorded cache event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    /// A query that ran uncached
    Uncached,
    /// A query served from cache
    Cached,
    /// A cache entry dropped by invalidation
    Invalidated,
}

impl CounterKind {
    /// All kinds, in persisted index order
    pub const ALL: [CounterKind; 3] = [
        CounterKind::Uncached,
        CounterKind::Cached,
        CounterKind::Invalidated,
    ];

    /// Numeric index used in the persisted counter key
    pub fn index(self) -> u8 {
        match self {
            CounterKind::Uncached => 0,
            CounterKind::Cached => 1,
            CounterKind::Invalidated => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::Uncached => "uncached",
            CounterKind::Cached => "cached",
            CounterKind::Invalidated => "invalidated",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store key of the counter hash for one (type, kind) pair
pub fn counter_key(type_key: &TypeKey, kind: CounterKind) -> String {
    format!("cache_stats:{type_key}:{}", kind.index())
}

/// Per-kind totals plus their sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTotals {
    pub uncached: u64,
    pub cached: u64,
    pub invalidated: u64,
    pub total: u64,
}

impl KindTotals {
    fn add(&mut self, kind: CounterKind, amount: u64) {
        match kind {
            CounterKind::Uncached => self.uncached += amount,
            CounterKind::Cached => self.cached += amount,
            CounterKind::Invalidated => self.invalidated += amount,
        }
        self.total += amount;
    }
}

/// Raw counts and totals for one entity type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    /// Kind name -> sub-key -> count, only for kinds with data
    pub data: BTreeMap<String, BTreeMap<String, u64>>,

    #[serde(flatten)]
    pub totals: KindTotals,
}

/// The aggregated report: per-type stats plus global totals.
///
/// A pure reduction of the raw counters; serializable for the (out-of-scope)
/// presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub types: BTreeMap<String, TypeStats>,
    pub totals: KindTotals,
}

/// Reads raw counters through the degrading client and folds them into a
/// [`StatsReport`].
pub struct StatsAggregator<S> {
    client: DegradingClient<S>,
}

impl<S: CacheStore> StatsAggregator<S> {
    pub fn new(client: DegradingClient<S>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DegradingClient<S> {
        &self.client
    }

    /// Read the membership set and parse its entries into type keys, sorted.
    ///
    /// Members that are not `namespace.type_name` keys are skipped with a
    /// warning; an unreachable backend degrades to an empty list.
    pub async fn participating_type_keys(&self) -> CacheResult<Vec<TypeKey>> {
        let members = self.client.set_members(MEMBERSHIP_KEY).await?;

        let mut keys: Vec<TypeKey> = members
            .iter()
            .filter_map(|member| match TypeKey::parse(member) {
                Some(key) => Some(key),
                None => {
                    warn!(
                        member = %member,
                        "Skipping stats member that is not a namespace.type_name key"
                    );
                    None
                }
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Build the report for the given type keys.
    ///
    /// A counter fetch degraded to empty counts as zero for that (type, kind)
    /// pair; the report never fails solely because the backend is
    /// unreachable. A counter value that is not a non-negative integer is a
    /// value error and propagates (it indicates store corruption, not an
    /// outage).
    pub async fn build_report(&self, type_keys: &[TypeKey]) -> CacheResult<StatsReport> {
        let mut report = StatsReport::default();

        for type_key in type_keys {
            let mut stats = TypeStats::default();

            for kind in CounterKind::ALL {
                let raw = self.client.hash_get_all(&counter_key(type_key, kind)).await?;

                let mut counts = BTreeMap::new();
                for (sub_key, value) in raw {
                    let count: u64 = value.parse().map_err(|_| {
                        CacheError::SerializationError(format!(
                            "counter {}:{} field '{}' has non-numeric value '{}'",
                            type_key,
                            kind.index(),
                            sub_key,
                            value
                        ))
                    })?;
                    stats.totals.add(kind, count);
                    report.totals.add(kind, count);
                    counts.insert(sub_key, count);
                }

                if !counts.is_empty() {
                    stats.data.insert(kind.as_str().to_string(), counts);
                }
            }

            report.types.insert(type_key.to_string(), stats);
        }

        Ok(report)
    }

    /// Membership read plus [`build_report`](Self::build_report)
    pub async fn build_full_report(&self) -> CacheResult<StatsReport> {
        let type_keys = self.participating_type_keys().await?;
        self.build_report(&type_keys).await
    }
}
