//! Cache Entry Module
//!
//! Defines a single cached value together with its expiration deadline.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute deadline on the monotonic clock, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// A zero `ttl` produces an entry that never expires.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::created_at(value, ttl, Instant::now())
    }

    /// Creates an entry whose deadline is computed from `now`.
    pub fn created_at(value: V, ttl: Duration, now: Instant) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            now.checked_add(ttl)
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks expiration against an explicit instant.
    ///
    /// An entry is expired only once `now` is strictly past its deadline, so an
    /// entry read exactly at its deadline is still served.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_with_zero_ttl_never_expires() {
        let entry = CacheEntry::new("value", Duration::ZERO);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(365 * 24 * 3600)));
    }

    #[test]
    fn test_entry_with_ttl_has_deadline() {
        let entry = CacheEntry::new("value", Duration::from_secs(60));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_expiration_is_strictly_after_deadline() {
        let now = Instant::now();
        let ttl = Duration::from_secs(1);
        let entry = CacheEntry::created_at("value", ttl, now);
        let deadline = now + ttl;

        assert!(!entry.is_expired_at(deadline - Duration::from_millis(1)));
        assert!(!entry.is_expired_at(deadline));
        assert!(entry.is_expired_at(deadline + Duration::from_millis(1)));
    }
}
