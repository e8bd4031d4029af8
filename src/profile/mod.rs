//! # Profile Resolution Module
//!
//! Turns the user-authored policy registry into per-type caching decisions.
//!
//! ## Architecture
//!
//! ```text
//! PolicyDeclaration (raw)  --build-->  ProfileTable (immutable)
//!                                          │ owned by ProfileRegistry
//!                                          ▼
//!                                      ProfileResolver (memoized)
//!                                          │
//!                                          ▼
//!                     Resolution: Profile | Disabled | Absent
//! ```
//!
//! ## Design Decisions
//!
//! - **Tagged variants over sentinels**: the `null`-policy marker and the
//!   `all`-operations sentinel are resolved into enum variants at table-build
//!   time, eliminating runtime value inspection
//! - **Fail-fast**: a declaration without a timeout aborts table construction,
//!   not the first lookup that touches it
//! - **Snapshot resolution**: resolvers memoize over the table snapshot they
//!   were created from; reloads swap the registry's table without disturbing
//!   in-flight resolvers

pub mod registry;
pub mod resolver;
pub mod table;
pub mod types;

pub use registry::ProfileRegistry;
pub use resolver::{ProfileResolver, Resolution};
pub use table::{ProfileTable, TableEntry};
pub use types::{Operation, OpsSpec, PolicyDeclaration, PolicyFields, ResolvedProfile, TypeKey};

/// Type-metadata seam: how an entity type reports its identity.
///
/// The host application's metadata system implements this; the core only
/// derives the [`TypeKey`] from it.
pub trait EntityMeta {
    fn namespace(&self) -> &str;

    fn type_name(&self) -> &str;

    fn type_key(&self) -> TypeKey {
        TypeKey::new(self.namespace(), self.type_name())
    }
}
