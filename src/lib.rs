#![allow(clippy::doc_markdown)] // Allow technical terms like Redis, YAML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # ModelCache Core
//!
//! Configuration-resolution and fault-tolerance core for a model query-caching
//! layer. The host application's data-access layer asks this crate two things:
//! "should this query be cached, and how?" and "can I keep serving traffic when
//! the cache backend is down?".
//!
//! ## Overview
//!
//! - **Profile resolution**: per-entity-type caching policies (operations to
//!   cache, TTL, locality options) are declared in configuration, merged with
//!   global defaults, and resolved through a fixed specificity chain
//!   (`namespace.type_name` → `namespace.*` → `*.*`) with memoized lookups.
//! - **Degradation**: a [`cache::DegradingClient`] wraps the underlying store
//!   so that connectivity failures on read operations become soft cache misses
//!   (with a warning) instead of propagating to the host. Writes always stay
//!   visible.
//! - **Stats aggregation**: raw hit/miss/invalidation counters kept in the
//!   store are folded into a per-type and global [`stats::StatsReport`] for a
//!   dashboard to render.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-aware YAML configuration loading and validation
//! - [`cache`] - Store abstraction, Redis implementation, degrading client
//! - [`profile`] - Policy declarations, profile table, registry and resolver
//! - [`stats`] - Counter key conventions and report aggregation
//! - [`error`] - Crate-level error type
//! - [`logging`] - Console tracing initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelcache_core::cache::{DegradingClient, RedisCacheStore};
//! use modelcache_core::config::ConfigManager;
//! use modelcache_core::profile::{Operation, ProfileRegistry, TypeKey};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! modelcache_core::logging::init_console_only();
//!
//! let manager = ConfigManager::load()?;
//! let config = manager.config();
//!
//! // Fail-fast policy table build, then per-type resolution.
//! let registry = ProfileRegistry::from_config(config)?;
//! let resolver = registry.resolver();
//! let key = TypeKey::new("app", "post");
//! if resolver.caches(&key, Operation::Fetch) {
//!     // cache the query per resolver.resolve(&key)
//! }
//!
//! // Store access that degrades to misses when the backend is unreachable.
//! let store = RedisCacheStore::from_config(&config.redis)?;
//! let client = DegradingClient::from_flag(store, config.degrade_on_failure);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod profile;
pub mod stats;

pub use cache::{CacheError, CacheResult, CacheStore, DegradingClient, ReadFailurePolicy};
pub use config::{ConfigManager, ConfigResult, ConfigurationError, ModelCacheConfig, RedisConfig};
pub use error::{ModelCacheError, Result};
pub use profile::{
    EntityMeta, Operation, OpsSpec, PolicyDeclaration, PolicyFields, ProfileRegistry,
    ProfileResolver, ProfileTable, Resolution, ResolvedProfile, TypeKey,
};
pub use stats::{CounterKind, StatsAggregator, StatsReport};
