//! Expiring key/value store and session tokens with sliding TTL.
//!
//! This crate provides:
//! - [`ExpiringStore`], a thread-safe map whose entries expire when not
//!   accessed within their own lifetime
//! - [`TokenSessions`], opaque session tokens with a short lifetime until
//!   they are marked as authenticated
//!
//! Expired entries are reclaimed lazily at the start of the next operation;
//! no background task is spawned.
//!
//! # Example
//!
//! ```rust,ignore
//! use lapse_session::{SessionConfig, TokenSessions};
//!
//! let config = SessionConfig::default()
//!     .with_unauthenticated_lifetime(Duration::from_secs(300))
//!     .with_authenticated_lifetime(Duration::from_secs(3600));
//!
//! let sessions: TokenSessions<String> = TokenSessions::new(config);
//! let token = sessions.add();
//! sessions.set_as_authenticated(&token)?;
//! ```

mod config;
mod entry;
mod error;
mod session;
mod store;
mod token;

pub use config::{
    DEFAULT_AUTHENTICATED_LIFETIME, DEFAULT_LIFETIME, DEFAULT_UNAUTHENTICATED_LIFETIME,
    SessionConfig, StoreConfig,
};
pub use error::{Result, SessionError, SessionResult, StoreError};
pub use session::TokenSessions;
pub use store::{ExpiringStore, StoreStats};
pub use token::{RANDOM_INPUT_SIZE, SaltedTokenGenerator, TokenGenerator};
