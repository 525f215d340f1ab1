//! Cache expiration model.
//!
//! The kernel keeps two caches fed by lookup responses:
//! - the attribute cache, consulted by `stat(2)` and friends instead of calling back into the filesystem,
//! - the dentry cache, which maps a (parent, name) pair to an inode and is revalidated through lookup.
//!
//! Each one gets its own deadline. Returning a deadline in the future is a promise that
//! the cached data will not change before that instant without the kernel being told.
//! When unsure, disable caching: the cost is extra lookups, never stale data.

use std::time::{Duration, SystemTime};

/// A deadline until which the kernel may trust cached data.
///
/// "Do not cache" is an explicit state, not a sentinel instant, so that
/// `Expiration::at(UNIX_EPOCH)` keeps its literal meaning (a deadline already passed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expiration(Option<SystemTime>);

impl Expiration {
    /// The kernel must revalidate on every access.
    pub const NEVER_CACHE: Expiration = Expiration(None);

    pub fn at(deadline: SystemTime) -> Self {
        Expiration(Some(deadline))
    }

    /// `now + ttl`, or a disabled expiration if the addition overflows the clock.
    pub fn after(now: SystemTime, ttl: Duration) -> Self {
        Expiration(now.checked_add(ttl))
    }

    pub fn is_disabled(&self) -> bool {
        self.0.is_none()
    }

    pub fn deadline(&self) -> Option<SystemTime> {
        self.0
    }

    /// Whether a consumer may still serve cached data at `now`.
    pub fn allows_caching_at(&self, now: SystemTime) -> bool {
        match self.deadline() {
            Some(deadline) => now < deadline,
            None => false,
        }
    }

    /// Time left before the deadline, zero when disabled or already passed.
    pub fn remaining(&self, now: SystemTime) -> Duration {
        self.deadline()
            .and_then(|deadline| deadline.duration_since(now).ok())
            .unwrap_or(Duration::ZERO)
    }
}

/// Fixed-TTL policy producing both expirations of a lookup response.
///
/// Each axis is configured and computed on its own; `None` disables caching for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub attributes_ttl: Option<Duration>,
    pub entry_ttl: Option<Duration>,
}

impl CachePolicy {
    /// No caching on either axis. This is the default.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Same TTL for attributes and entries.
    pub fn fixed(ttl: Duration) -> Self {
        Self {
            attributes_ttl: Some(ttl),
            entry_ttl: Some(ttl),
        }
    }

    pub fn attributes_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.attributes_ttl = ttl;
        self
    }

    pub fn entry_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.entry_ttl = ttl;
        self
    }

    /// Returns `(attributes_expiration, entry_expiration)` relative to `now`.
    pub fn expirations(&self, now: SystemTime) -> (Expiration, Expiration) {
        let expire = |ttl: Option<Duration>| match ttl {
            Some(ttl) if !ttl.is_zero() => Expiration::after(now, ttl),
            _ => Expiration::NEVER_CACHE,
        };
        (expire(self.attributes_ttl), expire(self.entry_ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_never_cache_is_not_epoch() {
        let epoch = Expiration::at(UNIX_EPOCH);
        assert!(Expiration::NEVER_CACHE.is_disabled());
        assert!(!epoch.is_disabled());
        assert_ne!(epoch, Expiration::NEVER_CACHE);
        assert_eq!(epoch.deadline(), Some(UNIX_EPOCH));
        assert_eq!(Expiration::NEVER_CACHE.deadline(), None);
        assert_eq!(Expiration::default(), Expiration::NEVER_CACHE);
    }

    #[test]
    fn test_allows_caching_at() {
        let now = SystemTime::now();
        let expiration = Expiration::after(now, Duration::from_secs(60));
        assert!(expiration.allows_caching_at(now));
        assert!(expiration.allows_caching_at(now + Duration::from_secs(59)));
        assert!(!expiration.allows_caching_at(now + Duration::from_secs(60)));
        assert!(!Expiration::NEVER_CACHE.allows_caching_at(now));
        assert!(!Expiration::at(UNIX_EPOCH).allows_caching_at(now));
    }

    #[test]
    fn test_remaining() {
        let now = SystemTime::now();
        let expiration = Expiration::after(now, Duration::from_secs(10));
        assert_eq!(expiration.remaining(now), Duration::from_secs(10));
        assert_eq!(
            expiration.remaining(now + Duration::from_secs(20)),
            Duration::ZERO
        );
        assert_eq!(Expiration::NEVER_CACHE.remaining(now), Duration::ZERO);
    }

    #[test]
    fn test_policy_axes_are_independent() {
        let now = SystemTime::now();
        let policy = CachePolicy::disabled().entry_ttl(Some(Duration::from_secs(60)));
        let (attributes, entry) = policy.expirations(now);
        assert!(attributes.is_disabled());
        assert_eq!(entry, Expiration::at(now + Duration::from_secs(60)));

        let policy = CachePolicy::disabled().attributes_ttl(Some(Duration::from_secs(5)));
        let (attributes, entry) = policy.expirations(now);
        assert!(attributes.allows_caching_at(now));
        assert!(entry.is_disabled());
    }

    #[test]
    fn test_zero_ttl_disables() {
        let (attributes, entry) = CachePolicy::fixed(Duration::ZERO).expirations(SystemTime::now());
        assert!(attributes.is_disabled());
        assert!(entry.is_disabled());
    }
}
