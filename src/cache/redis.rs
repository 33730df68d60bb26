use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::cache::traits::GeoRepository;
use crate::errors::{IpGeoError, Result};
use crate::models::GeoRecord;

/// Networked cache tier backed by Redis.
///
/// Records are stored as JSON under `<key_prefix><ip>` with a TTL applied
/// on every save; expiry is Redis' concern, not ours. The multiplexed
/// connection is established lazily and cached; it is reset on any
/// connection error so the next call reconnects.
pub struct RedisCache {
    client: redis::Client,
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
    /// TTL in seconds applied on every save.
    ttl: u64,
}

impl RedisCache {
    /// Create a Redis cache tier. Only validates the URL; the connection is
    /// established on first use so an unreachable Redis degrades the tier
    /// instead of failing startup.
    pub fn new(url: &str, key_prefix: &str, ttl: u64) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            IpGeoError::configuration(format!("failed to parse redis url: {}", e))
        })?;

        debug!(
            "RedisCache created with prefix: '{}', TTL: {}s",
            key_prefix, ttl
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: key_prefix.to_string(),
            ttl,
        })
    }

    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // Double check in case another task connected while we waited.
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, ip: &str) -> String {
        format!("{}{}", self.key_prefix, ip)
    }
}

#[async_trait]
impl GeoRepository for RedisCache {
    async fn get(&self, ip: &str) -> Result<Option<GeoRecord>> {
        let redis_key = self.make_key(ip);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(IpGeoError::cache_connection(format!(
                    "failed to get redis connection: {}",
                    e
                )));
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(&redis_key).await;

        match result {
            Ok(Some(data)) => {
                let record: GeoRecord = serde_json::from_str(&data).map_err(|e| {
                    IpGeoError::serialization(format!(
                        "corrupt redis payload for key '{}': {}",
                        redis_key, e
                    ))
                })?;
                trace!("retrieved key from redis: {}", redis_key);
                Ok(Some(record))
            }
            Ok(None) => {
                trace!("key not found in redis: {}", redis_key);
                Ok(None)
            }
            Err(e) => {
                // The connection may be gone; reconnect on the next call.
                self.reset_connection().await;
                Err(IpGeoError::cache_connection(format!(
                    "failed to read key '{}' from redis: {}",
                    redis_key, e
                )))
            }
        }
    }

    async fn save(&self, record: &GeoRecord) -> Result<()> {
        let redis_key = self.make_key(&record.ip);
        let payload = serde_json::to_string(record)?;

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(IpGeoError::cache_connection(format!(
                    "failed to get redis connection: {}",
                    e
                )));
            }
        };

        match conn
            .set_ex::<String, String, ()>(redis_key.clone(), payload, self.ttl)
            .await
        {
            Ok(_) => {
                trace!("saved key to redis: {}", redis_key);
                Ok(())
            }
            Err(e) => {
                self.reset_connection().await;
                Err(IpGeoError::cache_connection(format!(
                    "failed to save key '{}' to redis: {}",
                    redis_key, e
                )))
            }
        }
    }

    async fn status(&self) -> Result<()> {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(IpGeoError::cache_connection(format!(
                    "failed to get redis connection: {}",
                    e
                )));
            }
        };

        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.reset_connection().await;
                Err(IpGeoError::cache_connection(format!("redis ping failed: {}", e)))
            }
        }
    }
}
