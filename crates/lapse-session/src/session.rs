//! Session tokens with a two-tier sliding lifetime.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult, StoreError};
use crate::store::ExpiringStore;
use crate::token::{SaltedTokenGenerator, TokenGenerator};

/// Opaque session tokens backed by an [`ExpiringStore`].
///
/// New tokens live for the unauthenticated lifetime. Marking a token as
/// authenticated switches its sliding window to the authenticated lifetime;
/// nothing else records authentication.
///
/// Store errors are re-labelled for callers: an unknown or expired token is
/// [`SessionError::InvalidToken`].
pub struct TokenSessions<V, G: TokenGenerator = SaltedTokenGenerator> {
    store: ExpiringStore<Option<V>>,
    generator: Arc<G>,
    config: SessionConfig,
}

impl<V> TokenSessions<V, SaltedTokenGenerator> {
    /// Create a session layer using the salted generator seeded from `config.salt`.
    pub fn new(config: SessionConfig) -> Self {
        let generator = SaltedTokenGenerator::new(config.salt.as_bytes());
        Self::with_generator(config, generator)
    }
}

impl<V, G: TokenGenerator> TokenSessions<V, G> {
    /// Create a session layer with a custom token generator.
    pub fn with_generator(config: SessionConfig, generator: G) -> Self {
        Self {
            store: ExpiringStore::new(config.store_config()),
            generator: Arc::new(generator),
            config,
        }
    }

    /// Get the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Lifetime of tokens that have not authenticated.
    pub fn unauthenticated_lifetime(&self) -> Duration {
        self.config.unauthenticated_lifetime
    }

    /// Lifetime of authenticated tokens.
    pub fn authenticated_lifetime(&self) -> Duration {
        self.config.authenticated_lifetime
    }

    /// Create a new token with no value and return it.
    ///
    /// # Panics
    ///
    /// Panics if the generator returns a token that is still live. Tokens
    /// are assumed unique, so a collision means the generator is broken.
    pub fn add(&self) -> String {
        let token = self.generator.generate();

        match self.store.add(token.clone(), None) {
            Ok(()) => {
                trace!(token = %token, "Token created");
                token
            }
            Err(e) => panic!("Something is seriously wrong, a duplicated token was generated: {e}"),
        }
    }

    /// Replace the value stored for a token and postpone its expiration.
    pub fn set(&self, token: &str, value: V) -> SessionResult<()> {
        self.store
            .set(token, Some(value))
            .map_err(|e| invalid_token(token, e))
    }

    /// Remove a token.
    pub fn delete(&self, token: &str) -> SessionResult<()> {
        self.store
            .delete(token)
            .map(|_| ())
            .map_err(|e| invalid_token(token, e))
    }

    /// Switch a token to the authenticated lifetime and postpone its expiration.
    ///
    /// Calling it again only resets the expiration.
    pub fn set_as_authenticated(&self, token: &str) -> SessionResult<()> {
        self.store
            .set_lifetime(token, self.config.authenticated_lifetime)
            .map_err(|e| invalid_token(token, e))?;
        debug!(token = %token, "Token authenticated");
        Ok(())
    }

    /// Whether a token currently uses the authenticated lifetime.
    ///
    /// Only the applied lifetime is compared, so when both configured
    /// lifetimes are equal every live token reports `true`, fresh ones included.
    pub fn is_authenticated(&self, token: &str) -> SessionResult<bool> {
        let lifetime = self
            .store
            .lifetime(token)
            .map_err(|e| invalid_token(token, e))?;
        Ok(lifetime == self.config.authenticated_lifetime)
    }

    /// Check whether a token is live. Does not postpone expiration.
    pub fn contains(&self, token: &str) -> bool {
        self.store.contains(token)
    }

    /// Number of live tokens.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Drop every token.
    pub fn flush(&self) {
        self.store.flush();
    }
}

impl<V: Clone, G: TokenGenerator> TokenSessions<V, G> {
    /// Get the value stored for a token and postpone its expiration.
    ///
    /// A token that never had a value set returns `None`.
    pub fn get(&self, token: &str) -> SessionResult<Option<V>> {
        self.store.get(token).map_err(|e| invalid_token(token, e))
    }
}

impl<V, G: TokenGenerator> Clone for TokenSessions<V, G> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
        }
    }
}

impl<V, G: TokenGenerator> std::fmt::Debug for TokenSessions<V, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSessions")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn invalid_token(token: &str, e: StoreError) -> SessionError {
    debug!(token = %token, "Invalid or expired token");
    e.into()
}
