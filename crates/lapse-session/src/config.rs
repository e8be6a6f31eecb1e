//! Configuration for the expiring store and the session token layer.

use std::time::Duration;

/// Default lifetime applied to store entries added without an override.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(20 * 60);

/// Default lifetime for tokens that have not authenticated yet.
pub const DEFAULT_UNAUTHENTICATED_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Default lifetime for tokens marked as authenticated.
pub const DEFAULT_AUTHENTICATED_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Configuration for the expiring store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Lifetime given to new entries.
    /// An entry not accessed within this duration is considered expired.
    pub default_lifetime: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_lifetime: DEFAULT_LIFETIME,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lifetime given to new entries.
    pub fn with_default_lifetime(mut self, lifetime: Duration) -> Self {
        self.default_lifetime = lifetime;
        self
    }
}

/// Configuration for the session token layer.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sliding lifetime of a freshly created token.
    pub unauthenticated_lifetime: Duration,

    /// Sliding lifetime once a token is marked as authenticated.
    pub authenticated_lifetime: Duration,

    /// Seed mixed into the default token generator.
    pub salt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            unauthenticated_lifetime: DEFAULT_UNAUTHENTICATED_LIFETIME,
            authenticated_lifetime: DEFAULT_AUTHENTICATED_LIFETIME,
            salt: String::new(),
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lifetime of unauthenticated tokens.
    pub fn with_unauthenticated_lifetime(mut self, lifetime: Duration) -> Self {
        self.unauthenticated_lifetime = lifetime;
        self
    }

    /// Set the lifetime of authenticated tokens.
    pub fn with_authenticated_lifetime(mut self, lifetime: Duration) -> Self {
        self.authenticated_lifetime = lifetime;
        self
    }

    /// Set the seed for the default token generator.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Store configuration backing the session layer.
    pub(crate) fn store_config(&self) -> StoreConfig {
        StoreConfig::new().with_default_lifetime(self.unauthenticated_lifetime)
    }
}
