//! Store Module
//!
//! The key-value backends the cache facade talks to. `RedisStore` is the
//! production backend; `MemoryStore` keeps everything in-process and exposes
//! a controllable clock for tests.

mod entry;
mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use entry::StoredEntry;
pub use memory::MemoryStore;
pub use redis_store::{connect, RedisStore};

// == Key Value Store ==
/// Raw string operations against a key-value store.
///
/// Keys reaching this trait are already namespaced. Implementations must be
/// safe to share between concurrent callers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Round-trips a liveness probe.
    async fn ping(&self) -> Result<()>;

    /// Returns the stored text, or None when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`; `ttl` of None means no expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Deletes `key`. Absent keys are not an error.
    async fn del(&self, key: &str) -> Result<()>;

    /// Returns whether `key` currently exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Removes every key in the selected database.
    async fn flush_db(&self) -> Result<()>;
}
