//! Redis Cache - command-line client
//!
//! Connects with the `REDIS_*` environment (or `--redis-*` flags) and runs a
//! single cache operation.

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_cache::{codec, Cache, RedisConfig};

/// Command-line client for the Redis-backed cache
#[derive(Parser)]
#[command(name = "redis_cache", version, about)]
struct Cli {
    #[command(flatten)]
    redis: RedisConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the server answers
    Ping,
    /// Store a value; JSON input is stored as-is, anything else as a string
    Set {
        key: String,
        value: String,
        /// Time to live in seconds; 0 or less keeps the key forever
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        ttl: i64,
    },
    /// Print the value stored under a key as JSON
    Get { key: String },
    /// Print whether a key exists
    Has { key: String },
    /// Delete a key
    Forget { key: String },
    /// Delete every key in the database, whatever its prefix
    Flush {
        /// Confirm the flush
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(config = ?cli.redis, "Configuration loaded");

    // The cache is required; there is nothing to do without a connection
    let cache = match Cache::connect(cli.redis).await {
        Ok(cache) => cache,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cache, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cache: &Cache, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Ping => {
            cache.ping().await?;
            println!("PONG");
        }
        Command::Set { key, value, ttl } => {
            let value = if codec::is_json(&value) {
                codec::to_value(&value)?
            } else {
                Value::String(value)
            };
            cache
                .set(&key, &value, ttl)
                .await
                .with_context(|| format!("failed to set {}", key))?;
            println!("OK");
        }
        Command::Get { key } => {
            let value = cache
                .get(&key)
                .await
                .with_context(|| format!("failed to get {}", key))?;
            println!("{}", codec::to_json(&value)?);
        }
        Command::Has { key } => {
            println!("{}", cache.has(&key).await);
        }
        Command::Forget { key } => {
            cache
                .forget(&key)
                .await
                .with_context(|| format!("failed to forget {}", key))?;
            println!("OK");
        }
        Command::Flush { yes } => {
            if !yes {
                bail!(
                    "flush removes every key in database {}, not only '{}:*'; pass --yes to confirm",
                    cache.config().db,
                    cache.config().prefix
                );
            }
            cache.flush().await?;
            println!("OK");
        }
    }
    Ok(())
}
