//! Profile table construction
//!
//! Folds the policy declaration registry into a canonical declaration-key ->
//! entry table. Construction is fail-fast: a declaration that ends up without
//! a timeout after merging aborts the build with a configuration error naming
//! the offending key.

use super::types::{OpsSpec, PolicyDeclaration, PolicyFields, ResolvedProfile};
use crate::config::{ConfigResult, ConfigurationError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A table entry: a merged profile, or an explicit opt-out for that key
#[derive(Debug, Clone)]
pub enum TableEntry {
    Enabled(Arc<ResolvedProfile>),
    Disabled,
}

/// Immutable declaration-key -> entry mapping.
///
/// Keys are declaration keys as written in configuration (exact
/// `namespace.type_name`, namespace wildcard `namespace.*`, or the global
/// wildcard `*.*`). The table is never mutated after construction; reloads
/// build a fresh table and swap it in atomically at the registry level.
#[derive(Debug, Default)]
pub struct ProfileTable {
    entries: HashMap<String, TableEntry>,
}

impl ProfileTable {
    /// Build the table from global defaults and the declaration registry.
    ///
    /// Merge order per declaration: built-in baseline (no operations,
    /// `local_get = false`, `db_agnostic = true`, no timeout), then the
    /// global defaults, then the declaration itself. Later layers win;
    /// free-form extras merge map-wise with the same precedence.
    pub fn build(
        defaults: &PolicyFields,
        declarations: &BTreeMap<String, PolicyDeclaration>,
    ) -> ConfigResult<Self> {
        let mut entries = HashMap::with_capacity(declarations.len());

        for (key, declaration) in declarations {
            let entry = match declaration {
                PolicyDeclaration::Disabled => TableEntry::Disabled,
                PolicyDeclaration::Enabled(fields) => {
                    let profile = merge_declaration(key, defaults, fields)?;
                    TableEntry::Enabled(Arc::new(profile))
                }
            };
            entries.insert(key.clone(), entry);
        }

        Ok(Self { entries })
    }

    /// Look up a declaration key verbatim (no fallback logic here)
    pub fn entry(&self, declaration_key: &str) -> Option<&TableEntry> {
        self.entries.get(declaration_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declaration keys present in the table, sorted
    pub fn declaration_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Merge one enabled declaration over the defaults into a resolved profile
fn merge_declaration(
    key: &str,
    defaults: &PolicyFields,
    fields: &PolicyFields,
) -> ConfigResult<ResolvedProfile> {
    let operations = fields
        .ops
        .as_ref()
        .or(defaults.ops.as_ref())
        .map(OpsSpec::resolve)
        .unwrap_or_default();

    let local_get = fields.local_get.or(defaults.local_get).unwrap_or(false);
    let db_agnostic = fields.db_agnostic.or(defaults.db_agnostic).unwrap_or(true);

    let timeout_seconds = fields
        .timeout_seconds
        .or(defaults.timeout_seconds)
        .ok_or_else(|| {
            ConfigurationError::missing_required_field(
                "timeout_seconds",
                format!("cache policy '{key}'"),
            )
        })?;

    let mut extra = defaults.extra.clone();
    extra.extend(fields.extra.clone());

    Ok(ResolvedProfile {
        operations,
        local_get,
        db_agnostic,
        timeout_seconds,
        extra,
    })
}
