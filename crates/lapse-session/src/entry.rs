//! Expiring entry held by the store.

use std::time::{Duration, Instant};

/// Longest deadline tried when `now + lifetime` cannot be represented as an
/// [`Instant`]. Entries with such lifetimes effectively never expire.
const MAX_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A stored value with its own lifetime and sliding expiration instant.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    value: V,
    lifetime: Duration,
    expires_at: Instant,
}

impl<V> Entry<V> {
    /// Create an entry that expires `lifetime` from now.
    pub fn new(value: V, lifetime: Duration) -> Self {
        Self {
            value,
            lifetime,
            expires_at: deadline(Instant::now(), lifetime),
        }
    }

    /// Stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replace the stored value. Does not postpone expiration.
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// Consume the entry, returning its value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Lifetime used to compute the next expiration instant.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Replace the lifetime and postpone expiration using it.
    pub fn set_lifetime(&mut self, lifetime: Duration) {
        self.lifetime = lifetime;
        self.postpone();
    }

    /// Instant after which the entry is expired.
    #[cfg(test)]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Move expiration to now plus the entry lifetime.
    pub fn postpone(&mut self) {
        self.expires_at = deadline(Instant::now(), self.lifetime);
    }

    /// Whether the entry is expired at `now` (strictly after its expiration instant).
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    /// Whether the entry is expired.
    #[cfg(test)]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// `now + lifetime`, or the furthest instant up to `now + MAX_LIFETIME` the
/// platform can represent.
fn deadline(now: Instant, lifetime: Duration) -> Instant {
    if let Some(at) = now.checked_add(lifetime) {
        return at;
    }

    let mut cap = MAX_LIFETIME;
    loop {
        match now.checked_add(cap) {
            Some(at) => return at,
            None => cap /= 2,
        }
    }
}
