//! Expiring key/value store with sliding per-entry lifetimes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::error::{Result, StoreError};

type Entries<V> = HashMap<String, Entry<V>>;

/// In-memory key/value store whose entries expire when not accessed.
///
/// Every entry carries its own lifetime; a successful [`get`](Self::get),
/// [`set`](Self::set) or [`set_lifetime`](Self::set_lifetime) pushes its
/// expiration to now plus that lifetime.
///
/// Expired entries are reclaimed lazily: each operation except
/// [`flush`](Self::flush) first sweeps every expired entry out of the map.
/// No background task runs, so an expired entry stays in memory until the
/// next call of any kind.
///
/// A single mutex guards the map for the whole of each operation (sweep
/// included), which makes operations linearizable. Clones share the same map.
pub struct ExpiringStore<V> {
    entries: Arc<Mutex<Entries<V>>>,
    config: StoreConfig,
}

impl<V> ExpiringStore<V> {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Create an empty store whose entries default to `lifetime`.
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self::new(StoreConfig::new().with_default_lifetime(lifetime))
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Lifetime given to entries added without an override.
    pub fn default_lifetime(&self) -> Duration {
        self.config.default_lifetime
    }

    /// Add a new entry using the default lifetime.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if an unexpired entry already
    /// uses `key`. An expired entry under the same key is reclaimed first and
    /// does not block the insert.
    pub fn add(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.add_with_lifetime(key, value, self.config.default_lifetime)
    }

    /// Add a new entry with its own lifetime.
    pub fn add_with_lifetime(
        &self,
        key: impl Into<String>,
        value: V,
        lifetime: Duration,
    ) -> Result<()> {
        let key = key.into();
        let mut entries = self.entries.lock();
        sweep(&mut entries);

        if entries.contains_key(&key) {
            return Err(StoreError::DuplicateKey(key));
        }

        trace!(key = %key, lifetime = ?lifetime, "Entry added");
        entries.insert(key, Entry::new(value, lifetime));
        Ok(())
    }

    /// Replace the value of an existing entry and postpone its expiration.
    pub fn set(&self, key: &str, value: V) -> Result<()> {
        let mut entries = self.entries.lock();
        sweep(&mut entries);

        let entry = live_entry(&mut entries, key)?;
        entry.set_value(value);
        entry.postpone();
        trace!(key = %key, "Entry value replaced");
        Ok(())
    }

    /// Replace the lifetime of an existing entry.
    ///
    /// Expiration is postponed using the new lifetime, and every later access
    /// slides by it.
    pub fn set_lifetime(&self, key: &str, lifetime: Duration) -> Result<()> {
        let mut entries = self.entries.lock();
        sweep(&mut entries);

        live_entry(&mut entries, key)?.set_lifetime(lifetime);
        trace!(key = %key, lifetime = ?lifetime, "Entry lifetime changed");
        Ok(())
    }

    /// Current lifetime of an entry. Does not postpone expiration.
    pub fn lifetime(&self, key: &str) -> Result<Duration> {
        let mut entries = self.entries.lock();
        sweep(&mut entries);

        Ok(live_entry(&mut entries, key)?.lifetime())
    }

    /// Remove an existing entry and return its value.
    ///
    /// Fails with [`StoreError::KeyNotFound`] for absent and expired keys alike.
    pub fn delete(&self, key: &str) -> Result<V> {
        let mut entries = self.entries.lock();
        sweep(&mut entries);

        match entries.remove(key) {
            Some(entry) => {
                trace!(key = %key, "Entry deleted");
                Ok(entry.into_value())
            }
            None => Err(StoreError::KeyNotFound(key.to_string())),
        }
    }

    /// Check whether a live entry exists. Does not postpone expiration.
    pub fn contains(&self, key: &str) -> bool {
        let mut entries = self.entries.lock();
        sweep(&mut entries);
        entries.contains_key(key)
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        let mut entries = self.entries.lock();
        sweep(&mut entries);
        entries.len()
    }

    /// Check if the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Reclaim expired entries now and return how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        sweep(&mut self.entries.lock())
    }

    /// Drop every entry, expired or not.
    pub fn flush(&self) {
        let mut entries = self.entries.lock();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped = dropped, "Store flushed");
    }

    /// Get store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            size: self.count(),
            default_lifetime: self.config.default_lifetime,
        }
    }
}

impl<V: Clone> ExpiringStore<V> {
    /// Get a clone of the stored value and postpone its expiration.
    ///
    /// Fails with [`StoreError::KeyNotFound`] for absent and expired keys alike.
    pub fn get(&self, key: &str) -> Result<V> {
        let mut entries = self.entries.lock();
        sweep(&mut entries);

        let entry = live_entry(&mut entries, key)?;
        entry.postpone();
        trace!(key = %key, "Entry found");
        Ok(entry.value().clone())
    }
}

impl<V> Clone for ExpiringStore<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            config: self.config.clone(),
        }
    }
}

impl<V> std::fmt::Debug for ExpiringStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("config", &self.config)
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}

/// Store statistics.
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of live entries.
    pub size: usize,

    /// Lifetime given to entries added without an override.
    pub default_lifetime: Duration,
}

/// Remove every entry expired at the time of the call.
fn sweep<V>(entries: &mut Entries<V>) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now));

    let reclaimed = before - entries.len();
    if reclaimed > 0 {
        debug!(reclaimed = reclaimed, remaining = entries.len(), "Reclaimed expired entries");
    }
    reclaimed
}

/// Look up an entry the caller has just swept.
fn live_entry<'a, V>(entries: &'a mut Entries<V>, key: &str) -> Result<&'a mut Entry<V>> {
    entries
        .get_mut(key)
        .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
}
