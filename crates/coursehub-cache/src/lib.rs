//! # coursehub-cache
//!
//! Cache provider implementations for CourseHub:
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime from configuration. The cache is
//! only used for advisory state such as webhook delivery deduplication.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
