//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use coursehub_core::config::cache::MemoryCacheConfig;
use coursehub_core::result::AppResult;
use coursehub_core::traits::cache::CacheProvider;

/// A cached value together with the TTL it was written with.
#[derive(Debug, Clone)]
struct Slot {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL stored in its slot.
#[derive(Debug)]
struct SlotExpiry;

impl Expiry<String, Slot> for SlotExpiry {
    fn expire_after_create(&self, _key: &String, slot: &Slot, _created_at: Instant) -> Option<Duration> {
        Some(slot.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        slot: &Slot,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(slot.ttl)
    }
}

/// In-memory cache provider using moka with per-entry TTLs.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, Slot>,
    default_ttl: Duration,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig, default_ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(SlotExpiry)
            .build();

        Self {
            cache,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|slot| slot.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(
                key.to_string(),
                Slot {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        // `entry().or_insert` is atomic per key: exactly one caller sees a fresh entry.
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert(Slot {
                value: value.to_string(),
                ttl,
            })
            .await;
        Ok(entry.is_fresh())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        match self.cache.get(key).await {
            Some(slot) => {
                self.cache
                    .insert(
                        key.to_string(),
                        Slot {
                            value: slot.value,
                            ttl,
                        },
                    )
                    .await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 }, 60)
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(provider.get("key1").await.unwrap(), Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider.set_default("key2", "value2").await.unwrap();
        provider.delete("key2").await.unwrap();
        assert_eq!(provider.get("key2").await.unwrap(), None);
        assert!(!provider.exists("key2").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_nx() {
        let provider = make_provider();
        assert!(
            provider
                .set_nx("nx_key", "first", Duration::from_secs(60))
                .await
                .unwrap()
        );
        assert!(
            !provider
                .set_nx("nx_key", "second", Duration::from_secs(60))
                .await
                .unwrap()
        );
        assert_eq!(provider.get("nx_key").await.unwrap(), Some("first".to_string()));
    }

    #[tokio::test]
    async fn test_set_nx_after_delete() {
        let provider = make_provider();
        provider.set_nx("k", "v", Duration::from_secs(60)).await.unwrap();
        provider.delete("k").await.unwrap();
        assert!(provider.set_nx("k", "v", Duration::from_secs(60)).await.unwrap());
    }

    #[tokio::test]
    async fn test_per_entry_ttl() {
        let provider = make_provider();
        provider
            .set("short", "v", Duration::from_millis(50))
            .await
            .unwrap();
        provider
            .set("long", "v", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(provider.get("short").await.unwrap(), None);
        assert_eq!(provider.get("long").await.unwrap(), Some("v".to_string()));
        assert!(provider.set_nx("short", "again", Duration::from_secs(60)).await.unwrap());
    }

    #[tokio::test]
    async fn test_expire_missing_key() {
        let provider = make_provider();
        assert!(!provider.expire("absent", Duration::from_secs(1)).await.unwrap());
        provider.set_default("present", "v").await.unwrap();
        assert!(provider.expire("present", Duration::from_secs(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_set_nx_has_one_winner() {
        let provider = Arc::new(make_provider());
        let mut handles = Vec::new();
        for i in 0..16 {
            let provider = Arc::clone(&provider);
            handles.push(tokio::spawn(async move {
                provider
                    .set_nx("race", &i.to_string(), Duration::from_secs(60))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
