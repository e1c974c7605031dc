//! Redis Cache - A thin cache client on top of Redis
//!
//! Stores JSON-encoded values with a TTL under prefixed keys, and reads them
//! back as `serde_json::Value` or any deserializable type.
//!
//! ```ignore
//! let cache = Cache::connect(RedisConfig::from_env()).await?;
//! cache.set("user:42", &profile, 300).await?;
//! let value = cache.get("user:42").await?;
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;

pub use cache::Cache;
pub use config::RedisConfig;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
