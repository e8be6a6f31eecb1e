//! Error types for expiring store and session token operations.

/// Error type for [`ExpiringStore`](crate::ExpiringStore) operations.
///
/// Both variants carry the offending key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An unexpired entry already occupies the key.
    #[error("Could not create the '{0}' key because it already exists")]
    DuplicateKey(String),

    /// The key was never added, was deleted, or its entry has expired.
    #[error("Could not get the '{0}' key because it does not exist or it is expired")]
    KeyNotFound(String),
}

/// Error type for [`TokenSessions`](crate::TokenSessions) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The token is unknown, was deleted, or has expired.
    #[error("The requested token '{0}' is invalid or is expired")]
    InvalidToken(String),

    /// The token is already in use.
    #[error("The token '{0}' is already in use")]
    DuplicateToken(String),
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::KeyNotFound(key) => SessionError::InvalidToken(key),
            StoreError::DuplicateKey(key) => SessionError::DuplicateToken(key),
        }
    }
}

/// Result type for expiring store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Result type for session token operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
