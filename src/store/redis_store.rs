//! Redis Store Module
//!
//! Connection factory and the `KeyValueStore` backed by a Redis server.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

use super::KeyValueStore;
use crate::config::RedisConfig;
use crate::error::{CacheError, Result};

// == Redis Store ==
/// Store backed by a multiplexed Redis connection.
///
/// The connection is cloned per call; clones share one socket and pipeline
/// concurrent requests over it.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
    addr: String,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("addr", &self.addr).finish()
    }
}

impl RedisStore {
    /// Returns the `host:port` this store is bound to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn conn(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

// == Connect ==
/// Opens a connection to the server described by `config` and pings it.
///
/// Fails with `CacheError::Connect` when the server is unreachable or rejects
/// the credentials. No retry is attempted.
pub async fn connect(config: &RedisConfig) -> Result<RedisStore> {
    let addr = config.connection_addr();
    let url = config.connection_url()?;

    let client = Client::open(url.as_str()).map_err(|source| CacheError::Connect {
        addr: addr.clone(),
        source,
    })?;

    let connection = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|source| CacheError::Connect {
            addr: addr.clone(),
            source,
        })?;

    let store = RedisStore { connection, addr };
    store.ping().await.map_err(|e| match e {
        CacheError::Store(source) => CacheError::Connect {
            addr: store.addr.clone(),
            source,
        },
        other => other,
    })?;

    info!(addr = %store.addr, db = config.db, "Connected to Redis server");
    Ok(store)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!(addr = %self.addr, reply = %pong, "ping");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn();
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.conn();
        let _: i64 = conn.del(key).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn();
        let found: bool = conn.exists(key).await?;
        Ok(found)
    }

    async fn flush_db(&self) -> Result<()> {
        let mut conn = self.conn();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}
