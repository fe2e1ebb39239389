//! Cache Module
//!
//! Provides a generic in-memory cache with TTL expiration and a background
//! sweep of expired entries.

mod entry;
mod stats;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::{CacheCounters, CacheStats};
pub use ttl::{TtlCache, NO_EXPIRATION};
