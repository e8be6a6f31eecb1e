//! Token generation for session keys.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use parking_lot::Mutex;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Bytes of system randomness mixed into every token.
pub const RANDOM_INPUT_SIZE: usize = 64;

/// Source of opaque, practically unique session tokens.
///
/// The session layer treats a repeated token as a broken generator.
pub trait TokenGenerator: Send + Sync {
    /// Produce a new token.
    fn generate(&self) -> String;
}

impl<F> TokenGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Token generator chaining SHA-256 digests over a salt and random input.
///
/// The salt starts as the digest of the seed. Each token is the digest of
/// the current salt followed by [`RANDOM_INPUT_SIZE`] random bytes, and that
/// digest becomes the salt for the next token. Tokens are URL-safe base64
/// without padding.
pub struct SaltedTokenGenerator {
    salt: Mutex<[u8; 32]>,
}

impl SaltedTokenGenerator {
    /// Create a generator seeded with `seed`.
    pub fn new(seed: impl AsRef<[u8]>) -> Self {
        let mut salt = [0u8; 32];
        salt.copy_from_slice(&Sha256::digest(seed.as_ref()));
        Self {
            salt: Mutex::new(salt),
        }
    }
}

impl Default for SaltedTokenGenerator {
    fn default() -> Self {
        Self::new(b"")
    }
}

impl TokenGenerator for SaltedTokenGenerator {
    fn generate(&self) -> String {
        let mut random = [0u8; RANDOM_INPUT_SIZE];
        rand::rng().fill_bytes(&mut random);

        let mut salt = self.salt.lock();
        let mut hasher = Sha256::new();
        hasher.update(*salt);
        hasher.update(random);
        salt.copy_from_slice(&hasher.finalize());

        URL_SAFE_NO_PAD.encode(*salt)
    }
}

impl std::fmt::Debug for SaltedTokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltedTokenGenerator").finish_non_exhaustive()
    }
}
