//! In-Memory Store Module
//!
//! HashMap-backed store with a controllable clock. Clones share one keyspace,
//! the way two clients share one Redis database index.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::entry::{current_timestamp_ms, StoredEntry};
use super::KeyValueStore;
use crate::error::Result;

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, StoredEntry>,
    /// Simulated time added on top of the wall clock
    offset_ms: u64,
}

impl MemoryState {
    fn now_ms(&self) -> u64 {
        current_timestamp_ms().saturating_add(self.offset_ms)
    }

    /// Returns the live entry for `key`, dropping it first if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&StoredEntry> {
        let now = self.now_ms();
        if self.entries.get(key).is_some_and(|e| e.is_expired(now)) {
            self.entries.remove(key);
            debug!(key, "dropped expired entry");
        }
        self.entries.get(key)
    }
}

// == Memory Store ==
/// In-process key-value store with lazy expiry.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Fast Forward ==
    /// Advances the store clock by `by`, expiring entries whose TTL elapses.
    pub async fn fast_forward(&self, by: Duration) {
        let mut state = self.state.write().await;
        state.offset_ms = state.offset_ms.saturating_add(by.as_millis() as u64);
    }

    /// Returns remaining TTL of a live key, None for missing or persistent keys.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let mut state = self.state.write().await;
        let now = state.now_ms();
        state
            .live_entry(key)
            .and_then(|e| e.ttl_remaining_ms(now))
            .map(Duration::from_millis)
    }

    /// Returns the number of live entries.
    pub async fn len(&self) -> usize {
        let state = self.state.read().await;
        let now = state.now_ms();
        state.entries.values().filter(|e| !e.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut state = self.state.write().await;
        Ok(state.live_entry(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = StoredEntry::new(value.to_string(), ttl, state.now_ms());
        state.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.live_entry(key).is_some())
    }

    async fn flush_db(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        store.set("k", "v", None).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(store.exists("k").await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert!(!store.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_fast_forward_expires_entries() {
        let store = MemoryStore::new();
        store.set("short", "v", Some(Duration::from_secs(1))).await.unwrap();
        store.set("long", "v", Some(Duration::from_secs(60))).await.unwrap();
        store.set("forever", "v", None).await.unwrap();

        store.fast_forward(Duration::from_secs(2)).await;

        assert!(!store.exists("short").await.unwrap());
        assert!(store.exists("long").await.unwrap());
        assert!(store.exists("forever").await.unwrap());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryStore::new();
        store.set("k", "old", Some(Duration::from_secs(1))).await.unwrap();
        store.set("k", "new", None).await.unwrap();

        store.fast_forward(Duration::from_secs(5)).await;

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.ttl("k").await, None);
    }

    #[tokio::test]
    async fn test_ttl_remaining() {
        let store = MemoryStore::new();
        store.set("k", "v", Some(Duration::from_secs(10))).await.unwrap();
        store.fast_forward(Duration::from_secs(4)).await;

        let remaining = store.ttl("k").await.unwrap();
        assert!(remaining <= Duration::from_secs(6));
        assert!(remaining >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_del_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.del("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_keyspace_and_flush() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("a:1", "v", None).await.unwrap();
        other.set("b:1", "v", None).await.unwrap();

        assert!(other.exists("a:1").await.unwrap());

        other.flush_db().await.unwrap();
        assert!(store.is_empty().await);
    }
}
