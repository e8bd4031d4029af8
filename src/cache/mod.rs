//! # Cache Client Module
//!
//! Store abstraction, Redis implementation, and the degrading client wrapper.
//!
//! ## Architecture
//!
//! ```text
//! DegradingClient<S>              <- read-path degradation per ReadFailurePolicy
//!   └── S: CacheStore             <- async store trait
//!         └── RedisCacheStore     <- ConnectionManager-based, lazy connect
//! ```
//!
//! ## Design Decisions
//!
//! - **Policy at construction**: pass-through vs degrading is selected once
//!   from the `degrade_on_failure` flag, not per call site
//! - **Generic interception**: one combinator wraps every read; the miss value
//!   is the return type's `Default`
//! - **Writes stay visible**: write failures propagate regardless of policy
//! - **Lazy connection**: constructing the Redis store performs no I/O

pub mod client;
pub mod errors;
pub mod redis;
pub mod store;

pub use client::{DegradingClient, ReadFailurePolicy};
pub use errors::{CacheError, CacheResult};
pub use self::redis::RedisCacheStore;
pub use store::CacheStore;
