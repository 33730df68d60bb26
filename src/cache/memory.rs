use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::traits::GeoRepository;
use crate::errors::Result;
use crate::models::GeoRecord;

/// In-process cache tier backed by a concurrent hash map.
///
/// Reads take a shard read lock, writes take the shard write lock and
/// overwrite unconditionally (no versioning, no compare-and-swap). No lock
/// is ever held across an await point. Entries are never evicted: the map
/// grows for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryCache {
    inner: DashMap<String, GeoRecord>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }
}

#[async_trait]
impl GeoRepository for InMemoryCache {
    async fn get(&self, ip: &str) -> Result<Option<GeoRecord>> {
        Ok(self.inner.get(ip).map(|v| v.clone()))
    }

    async fn save(&self, record: &GeoRecord) -> Result<()> {
        self.inner.insert(record.ip.clone(), record.clone());
        Ok(())
    }

    async fn status(&self) -> Result<()> {
        // A local map cannot meaningfully fail. Probe with a sentinel key
        // and ignore the result.
        let _ = self.inner.get("");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str) -> GeoRecord {
        GeoRecord {
            ip: ip.to_string(),
            country_code: "AU".to_string(),
            country_name: "Australia".to_string(),
            city: "South Brisbane".to_string(),
            latitude: -27.4766,
            longitude: 153.0166,
        }
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("1.1.1.1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let cache = InMemoryCache::new();
        let r = record("1.1.1.1");

        cache.save(&r).await.unwrap();
        assert_eq!(cache.get("1.1.1.1").await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let cache = InMemoryCache::new();
        let r = record("1.1.1.1");

        cache.save(&r).await.unwrap();
        cache.save(&r).await.unwrap();

        assert_eq!(cache.get("1.1.1.1").await.unwrap(), Some(r));
        assert_eq!(cache.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let cache = InMemoryCache::new();
        let mut r = record("1.1.1.1");

        cache.save(&r).await.unwrap();
        r.city = "Brisbane".to_string();
        cache.save(&r).await.unwrap();

        assert_eq!(cache.get("1.1.1.1").await.unwrap().unwrap().city, "Brisbane");
    }

    #[tokio::test]
    async fn test_status_always_healthy() {
        let cache = InMemoryCache::new();
        assert!(cache.status().await.is_ok());
    }
}
