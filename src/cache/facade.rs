//! Cache Facade Module
//!
//! Public cache operations. Each call is a single request against the store;
//! nothing is cached in-process.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::key_with_prefix;
use crate::codec;
use crate::config::RedisConfig;
use crate::error::{CacheError, Result};
use crate::store::{self, KeyValueStore, RedisStore};

// == Cache ==
/// Cache handle owning one store connection and its configuration.
///
/// Every key passed in is namespaced as `{prefix}:{key}` before it reaches
/// the store.
#[derive(Debug, Clone)]
pub struct Cache<S = RedisStore> {
    config: RedisConfig,
    store: S,
}

impl Cache<RedisStore> {
    // == Connect ==
    /// Connects to the Redis server described by `config`.
    ///
    /// The connection is verified with a PING; an unreachable server or
    /// rejected credentials yield `CacheError::Connect`.
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let store = store::connect(&config).await?;
        Ok(Self::new(config, store))
    }
}

impl<S: KeyValueStore> Cache<S> {
    // == Constructor ==
    /// Wraps an already connected store.
    pub fn new(config: RedisConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    /// Direct access to the store, bypassing key namespacing.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the namespaced form of `key`.
    pub fn prefixed_key(&self, key: &str) -> String {
        key_with_prefix(&self.config.prefix, key)
    }

    // == Set ==
    /// Stores `value` as JSON under `key`.
    ///
    /// # Arguments
    /// * `key` - Logical key, namespaced before writing
    /// * `value` - Any serializable value
    /// * `ttl_seconds` - Time to live; zero or negative stores without expiry
    ///
    /// Nothing is written if `value` fails to encode.
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: i64) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let encoded = codec::to_json(value)?;
        let key = self.prefixed_key(key);
        let ttl = ttl_from_seconds(ttl_seconds);

        self.store.set(&key, &encoded, ttl).await?;
        debug!(key = %key, ttl_seconds, "cache set");
        Ok(())
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// JSON text is decoded into a `Value`; any other text comes back as
    /// `Value::String` unchanged. A missing or expired key yields
    /// `CacheError::NotFound`.
    pub async fn get(&self, key: &str) -> Result<Value> {
        let raw = self.fetch(key).await?;
        codec::decode(raw)
    }

    /// Retrieves the value stored under `key` as a `T`.
    ///
    /// Fails with `CacheError::Decode` when the stored value does not match `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key).await?;
        serde_json::from_value(value).map_err(CacheError::Decode)
    }

    // == Has ==
    /// Returns whether `key` currently exists.
    ///
    /// Store failures are logged and reported as `false`.
    pub async fn has(&self, key: &str) -> bool {
        let key = self.prefixed_key(key);
        match self.store.exists(&key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key = %key, error = %e, "cache existence check failed");
                false
            }
        }
    }

    // == Forget ==
    /// Deletes `key`. Deleting an absent key succeeds.
    pub async fn forget(&self, key: &str) -> Result<()> {
        let key = self.prefixed_key(key);
        self.store.del(&key).await?;
        debug!(key = %key, "cache forget");
        Ok(())
    }

    // == Flush ==
    /// Removes every key in the selected database index.
    ///
    /// This ignores the prefix: keys written by any other client sharing the
    /// same database index are removed too.
    pub async fn flush(&self) -> Result<()> {
        warn!(db = self.config.db, "flushing every key in the database");
        self.store.flush_db().await
    }

    /// Round-trips a liveness probe to the store.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    async fn fetch(&self, key: &str) -> Result<String> {
        let key = self.prefixed_key(key);
        match self.store.get(&key).await? {
            Some(raw) => Ok(raw),
            None => {
                debug!(key = %key, "cache miss");
                Err(CacheError::NotFound(key))
            }
        }
    }
}

/// Converts a TTL in seconds to the store's form; `<= 0` means no expiry.
fn ttl_from_seconds(ttl_seconds: i64) -> Option<Duration> {
    u64::try_from(ttl_seconds)
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    fn init_cache() -> Cache<MemoryStore> {
        Cache::new(RedisConfig::default(), MemoryStore::new())
    }

    #[test]
    fn test_ttl_from_seconds() {
        assert_eq!(ttl_from_seconds(5), Some(Duration::from_secs(5)));
        assert_eq!(ttl_from_seconds(0), None);
        assert_eq!(ttl_from_seconds(-3), None);
    }

    #[tokio::test]
    async fn test_get_then_expire() {
        let cache = init_cache();
        cache.set("test", "this is test value", 5).await.unwrap();

        assert_eq!(cache.get("test").await.unwrap(), json!("this is test value"));

        cache.store().fast_forward(Duration::from_secs(6)).await;

        let err = cache.get("test").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_has_then_expire() {
        let cache = init_cache();
        cache.set("testing", "This is just a test", 1).await.unwrap();

        assert!(cache.has("testing").await);
        assert!(!cache.has("test-some-val").await);

        cache.store().fast_forward(Duration::from_secs(2)).await;
        assert!(!cache.has("testing").await);
    }

    #[tokio::test]
    async fn test_set_writes_namespaced_key() {
        let cache = init_cache();
        cache.set("x", &json!({"a": 1}), 60).await.unwrap();

        let stored = cache.store().get("app-data:x").await.unwrap();
        assert_eq!(stored.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(cache.store().get("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_raw_string_written_outside() {
        let cache = init_cache();
        cache
            .store()
            .set("app-data:raw", "plain text, not json", None)
            .await
            .unwrap();

        assert_eq!(cache.get("raw").await.unwrap(), json!("plain text, not json"));
    }

    #[tokio::test]
    async fn test_get_structured_values() {
        let cache = init_cache();
        let value = json!({
            "name": "John Doe",
            "tags": ["a", "b"],
            "age": 42,
            "score": 1.5,
            "active": true,
            "manager": null
        });
        cache.set("user", &value, 60).await.unwrap();

        assert_eq!(cache.get("user").await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let cache = init_cache();
        match cache.get("nope").await {
            Err(CacheError::NotFound(key)) => assert_eq!(key, "app-data:nope"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_set_unencodable_writes_nothing() {
        let cache = init_cache();
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys are not JSON");

        let err = cache.set("bad", &bad, 60).await.unwrap_err();
        assert!(matches!(err, CacheError::Encode(_)));
        assert!(!cache.has("bad").await);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let cache = init_cache();
        cache.set("forever", &1, 0).await.unwrap();
        cache.set("also-forever", &2, -10).await.unwrap();

        cache.store().fast_forward(Duration::from_secs(86_400)).await;

        assert_eq!(cache.get("forever").await.unwrap(), json!(1));
        assert_eq!(cache.get("also-forever").await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_forget() {
        let cache = init_cache();
        cache.set("gone", "soon", 60).await.unwrap();
        cache.forget("gone").await.unwrap();

        assert!(!cache.has("gone").await);
        cache.forget("gone").await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_ignores_prefix() {
        let store = MemoryStore::new();
        let mine = Cache::new(RedisConfig::default(), store.clone());
        let theirs = Cache::new(
            RedisConfig {
                prefix: "other-app".to_string(),
                ..RedisConfig::default()
            },
            store.clone(),
        );
        mine.set("a", "1", 60).await.unwrap();
        theirs.set("b", "2", 60).await.unwrap();

        mine.flush().await.unwrap();

        assert!(!mine.has("a").await);
        assert!(!theirs.has("b").await);
        assert!(store.is_empty().await);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        visits: u32,
    }

    #[tokio::test]
    async fn test_get_as_typed() {
        let cache = init_cache();
        let profile = Profile {
            name: "John Doe".to_string(),
            visits: 3,
        };
        cache.set("profile", &profile, 60).await.unwrap();

        let loaded: Profile = cache.get_as("profile").await.unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn test_get_as_mismatch_is_decode_error() {
        let cache = init_cache();
        cache.set("profile", &json!(["not", "a", "profile"]), 60).await.unwrap();

        let result = cache.get_as::<Profile>("profile").await;
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(init_cache().ping().await.is_ok());
    }
}
