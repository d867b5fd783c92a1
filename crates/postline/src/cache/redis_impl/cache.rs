//! Redis-backed volatile cache.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, FromRedisValue};

use postline_core::cache::{Cache, Result};

use super::error::map_redis_error;

/// Cache of entity snapshots kept in Redis.
///
/// Every command goes through one `ConnectionManager`, which reconnects on
/// its own. A command issued while the link is down fails with
/// `ConnectionFailed`; nothing is retried at this level.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Opens a managed connection to `url`, e.g. `redis://localhost:6379`.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;

        tracing::info!(%url, "Connected to Redis cache");
        Ok(Self { manager })
    }

    async fn run<T: FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        let mut manager = self.manager.clone();
        cmd.query_async(&mut manager).await.map_err(map_redis_error)
    }
}

/// Builds `SET key value [EX seconds]`.
///
/// `EX 0` is an error in Redis, so sub-second TTLs round up to one second.
fn set_command(key: &str, value: &[u8], ttl: Option<Duration>) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value);
    if let Some(ttl) = ttl {
        cmd.arg("EX").arg(ttl.as_secs().max(1));
    }
    cmd
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.run(redis::cmd("GET").arg(key)).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.run(&set_command(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let removed: u64 = self.run(redis::cmd("DEL").arg(key)).await?;
        Ok(removed > 0)
    }
}
