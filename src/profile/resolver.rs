//! Per-type profile resolution
//!
//! Resolution is a pure function of the type key and the immutable table
//! snapshot taken at resolver construction, memoized per distinct key.
//! Concurrent first lookups of the same key may compute twice; they converge
//! on the same value.

use super::table::{ProfileTable, TableEntry};
use super::types::{Operation, ResolvedProfile, TypeKey};
use super::EntityMeta;
use dashmap::DashMap;
use std::sync::Arc;

/// Outcome of resolving a type key against the profile table.
///
/// `Absent` is a normal outcome, not an error: caching behavior for that type
/// is determined entirely by caller-side defaults. It is distinct from
/// `Disabled`, which records an explicit opt-out in configuration.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A declaration matched; here are the merged rules
    Profile(Arc<ResolvedProfile>),
    /// The most specific matching declaration explicitly disables caching
    Disabled,
    /// No declaration matched anywhere in the fallback chain
    Absent,
}

impl Resolution {
    pub fn profile(&self) -> Option<&ResolvedProfile> {
        match self {
            Resolution::Profile(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Resolution::Disabled)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Resolution::Absent)
    }

    /// Whether the resolved rules cache the given operation
    pub fn caches(&self, operation: Operation) -> bool {
        self.profile()
            .is_some_and(|profile| profile.caches(operation))
    }
}

/// Memoized resolver over an immutable table snapshot
pub struct ProfileResolver {
    table: Arc<ProfileTable>,
    memo: DashMap<TypeKey, Resolution>,
}

impl ProfileResolver {
    pub fn new(table: Arc<ProfileTable>) -> Self {
        Self {
            table,
            memo: DashMap::new(),
        }
    }

    /// Resolve a type key through the specificity chain: exact key, then
    /// `namespace.*`, then `*.*`. The first candidate present in the table
    /// wins, whatever its entry says.
    pub fn resolve(&self, key: &TypeKey) -> Resolution {
        if let Some(hit) = self.memo.get(key) {
            return hit.clone();
        }

        let resolution = self.lookup(key);
        self.memo.insert(key.clone(), resolution.clone());
        resolution
    }

    fn lookup(&self, key: &TypeKey) -> Resolution {
        for candidate in key.fallback_chain() {
            match self.table.entry(&candidate) {
                Some(TableEntry::Enabled(profile)) => {
                    return Resolution::Profile(Arc::clone(profile))
                }
                Some(TableEntry::Disabled) => return Resolution::Disabled,
                None => {}
            }
        }
        Resolution::Absent
    }

    /// Resolve through the type-metadata seam
    pub fn resolve_entity<E: EntityMeta + ?Sized>(&self, entity: &E) -> Resolution {
        self.resolve(&entity.type_key())
    }

    /// Convenience for the caching decision site
    pub fn caches(&self, key: &TypeKey, operation: Operation) -> bool {
        self.resolve(key).caches(operation)
    }

    /// The table snapshot this resolver answers from
    pub fn table(&self) -> &Arc<ProfileTable> {
        &self.table
    }
}
