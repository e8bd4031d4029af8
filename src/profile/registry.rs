//! Profile registry
//!
//! Owns the profile table for the process lifetime. The table is built once
//! at construction (fail-fast on invalid declarations) and shared read-only;
//! an explicit reload builds a fresh table and swaps it in atomically.
//! Resolvers hold the snapshot they were created from, so in-flight callers
//! never observe a half-built table.

use super::resolver::ProfileResolver;
use super::table::ProfileTable;
use super::types::{PolicyDeclaration, PolicyFields};
use crate::config::{ConfigResult, ModelCacheConfig};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct ProfileRegistry {
    table: RwLock<Arc<ProfileTable>>,
}

impl ProfileRegistry {
    /// Build the registry from global defaults and the declaration registry.
    ///
    /// Declaration problems (a missing timeout after merging, an unknown
    /// operation name) surface here, before any resolution call succeeds.
    pub fn new(
        defaults: &PolicyFields,
        declarations: &BTreeMap<String, PolicyDeclaration>,
    ) -> ConfigResult<Self> {
        let table = Arc::new(ProfileTable::build(defaults, declarations)?);

        crate::log_config!(info, "Cache policy table built",
            declaration_count: table.len()
        );

        Ok(Self {
            table: RwLock::new(table),
        })
    }

    /// Build from loaded configuration
    pub fn from_config(config: &ModelCacheConfig) -> ConfigResult<Self> {
        Self::new(&config.defaults, &config.policies)
    }

    /// The current table. Every call returns the same shared instance until
    /// an explicit [`reload`](Self::reload); mutating the source
    /// configuration after construction has no effect.
    pub fn table(&self) -> Arc<ProfileTable> {
        Arc::clone(&self.table.read())
    }

    /// Build a fresh table from new declarations and swap it in atomically.
    ///
    /// On error the current table stays in place untouched.
    pub fn reload(
        &self,
        defaults: &PolicyFields,
        declarations: &BTreeMap<String, PolicyDeclaration>,
    ) -> ConfigResult<()> {
        let fresh = Arc::new(ProfileTable::build(defaults, declarations)?);

        crate::log_config!(info, "Cache policy table reloaded",
            declaration_count: fresh.len()
        );

        *self.table.write() = fresh;
        Ok(())
    }

    /// A resolver over the current table snapshot
    pub fn resolver(&self) -> ProfileResolver {
        ProfileResolver::new(self.table())
    }
}
