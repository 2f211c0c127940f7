//! Mostinger feed cache subsystem.
//!
//! Sits between the HTTP handlers and Postgres on the post read path:
//!
//! - **keys**: deterministic cache key derivation from query parameters
//! - **store**: the key/value adapter (Redis or in-memory) with per-key TTL
//!   and prefix deletion; every operation fails open
//! - **trigger**: coarse namespace invalidation issued after committed writes
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `mostinger.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 300
//! # url = "redis://127.0.0.1:6379/0"   # omit to use the in-process store
//! ```

mod config;
pub mod keys;
mod store;
mod trigger;

pub use config::CacheConfig;
pub use store::{CacheError, CacheStore, FeedCache, MemoryCacheStore, RedisCacheStore};
pub use trigger::CacheTrigger;
