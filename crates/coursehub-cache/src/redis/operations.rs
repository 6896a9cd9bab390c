//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
    default_ttl: Duration,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient, default_ttl_seconds: u64) -> Self {
        Self {
            client,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

/// Redis rejects `EX 0`; round sub-second TTLs up to one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn();
        conn.get(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: () = conn
            .set_ex(self.client.prefixed_key(key), value, ttl_secs(ttl))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let result: Option<String> = redis::cmd("SET")
            .arg(self.client.prefixed_key(key))
            .arg(value)
            .arg("EX")
            .arg(ttl_secs(ttl))
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(result.is_some())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: () = conn
            .del(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.client.conn();
        conn.exists(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.client.conn();
        conn.expire(self.client.prefixed_key(key), ttl_secs(ttl) as i64)
            .await
            .map_err(Self::map_err)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
