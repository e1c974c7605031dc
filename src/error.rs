//! Error types for the cache client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache client.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Store unreachable or credentials rejected while connecting
    #[error("Error connecting to Redis server at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: redis::RedisError,
    },

    /// Connection parameters could not be turned into a client address
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Value could not be serialized
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored text could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Key absent or expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Transport or protocol failure
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),
}

impl CacheError {
    /// Returns true when the error is a cache miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache client.
pub type Result<T> = std::result::Result<T, CacheError>;
