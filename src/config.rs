//! Configuration Module
//!
//! Handles loading the Redis connection parameters from environment variables,
//! with command-line flags taking precedence when parsed through clap.

use std::convert::Infallible;
use std::env;
use std::fmt;

use clap::Args;
use url::Url;

use crate::error::{CacheError, Result};

// == Defaults ==
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: &str = "6379";
pub const DEFAULT_PASSWORD: &str = "";
pub const DEFAULT_DB: i64 = 0;
pub const DEFAULT_PREFIX: &str = "app-data";

/// Redis connection parameters and key namespace.
///
/// Every field can be set through an environment variable or the matching
/// `--redis-*` flag. Flags win over the environment, which wins over defaults.
#[derive(Args, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Redis server host
    #[arg(long = "redis-host", env = "REDIS_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Redis server port
    #[arg(long = "redis-port", env = "REDIS_PORT", default_value = DEFAULT_PORT)]
    pub port: String,

    /// Redis server password
    #[arg(
        long = "redis-password",
        env = "REDIS_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true
    )]
    pub password: String,

    /// Redis database index (unparsable values fall back to 0)
    #[arg(
        long = "redis-db",
        env = "REDIS_DB",
        default_value = "0",
        value_parser = parse_db_index
    )]
    pub db: i64,

    /// Prefix prepended to every cache key
    #[arg(long = "redis-prefix", env = "REDIS_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,
}

impl RedisConfig {
    /// Creates a new RedisConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Server host (default: localhost)
    /// - `REDIS_PORT` - Server port (default: 6379)
    /// - `REDIS_PASSWORD` - Server password (default: empty)
    /// - `REDIS_DB` - Database index (default: 0)
    /// - `REDIS_PREFIX` - Cache key prefix (default: app-data)
    pub fn from_env() -> Self {
        Self {
            host: getenv("REDIS_HOST", DEFAULT_HOST),
            port: getenv("REDIS_PORT", DEFAULT_PORT),
            password: getenv("REDIS_PASSWORD", DEFAULT_PASSWORD),
            db: env::var("REDIS_DB")
                .ok()
                .map(|v| db_index_or_default(&v))
                .unwrap_or(DEFAULT_DB),
            prefix: getenv("REDIS_PREFIX", DEFAULT_PREFIX),
        }
    }

    // == Connection Address ==
    /// Returns the `host:port` address of the server.
    pub fn connection_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    // == Connection URL ==
    /// Builds the `redis://` URL for this configuration.
    ///
    /// The password is percent-encoded into the userinfo section and the
    /// database index becomes the path.
    pub fn connection_url(&self) -> Result<String> {
        let raw = format!("redis://{}/{}", self.connection_addr(), self.db);
        let mut url = Url::parse(&raw).map_err(|e| {
            CacheError::InvalidConfig(format!("cannot build URL for {}: {}", self.connection_addr(), e))
        })?;

        if !self.password.is_empty() {
            url.set_password(Some(&self.password)).map_err(|_| {
                CacheError::InvalidConfig(format!(
                    "cannot attach password to {}",
                    self.connection_addr()
                ))
            })?;
        }

        Ok(url.to_string())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            db: DEFAULT_DB,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

// Password stays out of logs.
impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("RedisConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &password)
            .field("db", &self.db)
            .field("prefix", &self.prefix)
            .finish()
    }
}

// == Utility Functions ==
/// Reads an environment variable, falling back to `fallback` when unset.
fn getenv(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn db_index_or_default(value: &str) -> i64 {
    value.parse().unwrap_or(DEFAULT_DB)
}

/// clap value parser for the database index; never rejects input.
fn parse_db_index(value: &str) -> std::result::Result<i64, Infallible> {
    Ok(db_index_or_default(value))
}
