//! Policy declaration and resolved profile types
//!
//! Raw, user-authored declarations ([`PolicyFields`], [`PolicyDeclaration`])
//! are tagged variants resolved once at table-build time; after resolution a
//! [`ResolvedProfile`] always carries a concrete operation set and a timeout.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A cacheable query operation kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Single-row primary-key lookup
    Get,
    /// General queryset fetch
    Fetch,
    /// Row count
    Count,
    /// Existence check
    Exists,
}

impl Operation {
    /// The full fixed operation set, in declaration order
    pub const ALL: [Operation; 4] = [
        Operation::Get,
        Operation::Fetch,
        Operation::Count,
        Operation::Exists,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Fetch => "fetch",
            Operation::Count => "count",
            Operation::Exists => "exists",
        }
    }

    /// The full fixed set as a concrete operation set
    pub fn all_set() -> BTreeSet<Operation> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Operation::Get),
            "fetch" => Ok(Operation::Fetch),
            "count" => Ok(Operation::Count),
            "exists" => Ok(Operation::Exists),
            other => Err(format!(
                "unknown cache operation '{other}' (expected one of get, fetch, count, exists)"
            )),
        }
    }
}

/// Declared operations field: the `all` sentinel, a single operation, or an
/// explicit list. Normalized to a concrete set at table-build time via
/// [`OpsSpec::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OpsSpecRepr", into = "OpsSpecRepr")]
pub enum OpsSpec {
    /// The `all` sentinel: every operation in the fixed enumeration
    All,
    /// A single bare operation name
    One(Operation),
    /// An explicit list of operation names
    Explicit(Vec<Operation>),
}

impl OpsSpec {
    /// Normalize to a concrete operation set (never the sentinel)
    pub fn resolve(&self) -> BTreeSet<Operation> {
        match self {
            OpsSpec::All => Operation::all_set(),
            OpsSpec::One(op) => BTreeSet::from([*op]),
            OpsSpec::Explicit(ops) => ops.iter().copied().collect(),
        }
    }
}

/// Serde-facing shape of the operations field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum OpsSpecRepr {
    Word(String),
    List(Vec<Operation>),
}

impl TryFrom<OpsSpecRepr> for OpsSpec {
    type Error = String;

    fn try_from(repr: OpsSpecRepr) -> Result<Self, Self::Error> {
        match repr {
            OpsSpecRepr::Word(word) if word == "all" => Ok(OpsSpec::All),
            OpsSpecRepr::Word(word) => word.parse().map(OpsSpec::One),
            OpsSpecRepr::List(ops) => Ok(OpsSpec::Explicit(ops)),
        }
    }
}

impl From<OpsSpec> for OpsSpecRepr {
    fn from(spec: OpsSpec) -> Self {
        match spec {
            OpsSpec::All => OpsSpecRepr::Word("all".to_string()),
            OpsSpec::One(op) => OpsSpecRepr::Word(op.as_str().to_string()),
            OpsSpec::Explicit(ops) => OpsSpecRepr::List(ops),
        }
    }
}

/// Raw, user-authored policy fields.
///
/// Every field is optional at declaration level; merging with the global
/// defaults and the built-in baseline happens at table-build time. Unknown
/// keys are carried as free-form extras and merged map-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyFields {
    /// Operations to cache (`all`, a single name, or a list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops: Option<OpsSpec>,

    /// Serve primary-key gets from a process-local front cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_get: Option<bool>,

    /// Cache key ignores which database the query ran against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_agnostic: Option<bool>,

    /// Cache entry time-to-live. Required after merging; there is no
    /// implicit default.
    #[serde(default, alias = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Free-form extra options, merged from global defaults (declaration
    /// wins per key)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A declaration-registry entry: caching rules, or an explicit opt-out.
///
/// The `Disabled` marker (a `null` value in configuration) is distinguishable
/// from "no declaration found" all the way through resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<PolicyFields>", into = "Option<PolicyFields>")]
pub enum PolicyDeclaration {
    Enabled(PolicyFields),
    Disabled,
}

impl From<Option<PolicyFields>> for PolicyDeclaration {
    fn from(fields: Option<PolicyFields>) -> Self {
        match fields {
            Some(fields) => PolicyDeclaration::Enabled(fields),
            None => PolicyDeclaration::Disabled,
        }
    }
}

impl From<PolicyDeclaration> for Option<PolicyFields> {
    fn from(declaration: PolicyDeclaration) -> Self {
        match declaration {
            PolicyDeclaration::Enabled(fields) => Some(fields),
            PolicyDeclaration::Disabled => None,
        }
    }
}

/// Canonical, immutable result of merging one declaration with the defaults.
///
/// Invariants: `timeout_seconds` is always present, `operations` is always a
/// concrete subset of the fixed enumeration (never the `all` sentinel).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProfile {
    pub operations: BTreeSet<Operation>,
    pub local_get: bool,
    pub db_agnostic: bool,
    pub timeout_seconds: u64,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ResolvedProfile {
    /// Cache entry TTL as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Whether this profile caches the given operation
    pub fn caches(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

/// Stable identifier for an entity type: `namespace.type_name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey {
    namespace: String,
    type_name: String,
}

impl TypeKey {
    /// Build a key from its parts.
    ///
    /// Neither part may contain the `.` separator; a dotted part would make
    /// the rendered key ambiguous to [`parse`](Self::parse).
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let type_name = type_name.into();
        debug_assert!(
            !namespace.contains('.') && !type_name.contains('.'),
            "type key parts must not contain '.'"
        );
        Self {
            namespace,
            type_name,
        }
    }

    /// Parse a `namespace.type_name` string. Returns `None` when the single
    /// separator is missing, repeated, or either side is empty.
    pub fn parse(s: &str) -> Option<Self> {
        let (namespace, type_name) = s.split_once('.')?;
        if namespace.is_empty() || type_name.is_empty() || type_name.contains('.') {
            return None;
        }
        Some(Self::new(namespace, type_name))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The ordered specificity chain used to look this key up in the table:
    /// exact key, namespace wildcard, global wildcard.
    pub fn fallback_chain(&self) -> [String; 3] {
        [
            format!("{}.{}", self.namespace, self.type_name),
            format!("{}.*", self.namespace),
            "*.*".to_string(),
        ]
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.type_name)
    }
}

impl FromStr for TypeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("'{s}' is not a namespace.type_name key"))
    }
}
