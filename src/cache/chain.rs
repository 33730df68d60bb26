use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{Instrument, debug, error, trace, warn};

use crate::cache::traits::GeoRepository;
use crate::errors::{IpGeoError, Result};
use crate::models::GeoRecord;

/// One registered tier: a human-readable name paired with the repository
/// serving it. Names are unique within a chain.
#[derive(Clone)]
pub struct Cache {
    name: String,
    repository: Arc<dyn GeoRepository>,
}

/// An ordered chain of cache tiers.
///
/// Lookups walk the tiers in registration order and return the first hit.
/// Tiers that missed before the hit are then backfilled asynchronously with
/// the found record, so faster tiers converge toward the slower ones that
/// still hold the value. Registration order matters: put the fastest tier
/// first, e.g.
///
/// 1. in-memory map - very fast
/// 2. Redis - fast, but slower than the in-memory map
///
/// The registration list is built once at startup (single writer, before
/// traffic) and is read-only afterwards; `get`, `save_in_all_caches` and
/// `statuses` are independent operations over that immutable set.
#[derive(Default)]
pub struct CacheChain {
    caches: Vec<Cache>,
}

impl CacheChain {
    /// Return a new empty chain. It is up to the caller to register tiers
    /// with [`CacheChain::add`] before serving traffic.
    pub fn new() -> Self {
        Self { caches: Vec::new() }
    }

    /// Register a tier at the end of the chain.
    ///
    /// Fails when `name` is already registered; the existing registration
    /// keeps serving and the chain is left unchanged. Startup wiring should
    /// treat this error as fatal.
    pub fn add(&mut self, name: &str, repository: Arc<dyn GeoRepository>) -> Result<()> {
        if self.caches.iter().any(|c| c.name == name) {
            return Err(IpGeoError::duplicate_cache(format!(
                "cache '{}' already present in chain",
                name
            )));
        }

        self.caches.push(Cache {
            name: name.to_string(),
            repository,
        });

        Ok(())
    }

    /// Look up `ip` across the chain, first registered tier first.
    ///
    /// On a hit the record is returned immediately; every tier that was
    /// already confirmed absent is backfilled by a detached background task
    /// (tiers behind the hitting one are never queried, never touched). No
    /// completion signal for the backfill is exposed. A tier failure is
    /// logged and treated as a miss, never propagated.
    ///
    /// Returns `NotFound` when no tier holds the key; it is then on the
    /// caller to consult the origin provider and populate the chain.
    pub async fn get(&self, ip: &str) -> Result<GeoRecord> {
        let mut missed: Vec<Cache> = Vec::new();

        for cache in &self.caches {
            trace!(cache = %cache.name, ip = %ip, "looking up tier in cache chain");

            match cache.repository.get(ip).await {
                Ok(Some(record)) => {
                    debug!(cache = %cache.name, ip = %ip, "cache hit");

                    if !missed.is_empty() {
                        let record = record.clone();
                        tokio::spawn(
                            async move {
                                Self::save_in_caches(&missed, &record).await;
                            }
                            .in_current_span(),
                        );
                    }

                    return Ok(record);
                }
                Ok(None) => {
                    debug!(cache = %cache.name, ip = %ip, "cache miss");
                    missed.push(cache.clone());
                }
                Err(e) => {
                    warn!(cache = %cache.name, ip = %ip, error = %e, "tier unavailable, treated as miss");
                    missed.push(cache.clone());
                }
            }
        }

        Err(IpGeoError::not_found(format!(
            "no entry for '{}' in any tier of the cache chain",
            ip
        )))
    }

    /// Save `record` in every registered tier, one concurrent save per tier,
    /// waiting for all of them. A failed save is logged and does not fail
    /// the others; partial success is an accepted outcome.
    pub async fn save_in_all_caches(&self, record: &GeoRecord) {
        Self::save_in_caches(&self.caches, record).await;
    }

    async fn save_in_caches(targets: &[Cache], record: &GeoRecord) {
        join_all(targets.iter().map(|cache| async move {
            debug!(cache = %cache.name, ip = %record.ip, "updating cache tier");

            if let Err(e) = cache.repository.save(record).await {
                error!(cache = %cache.name, ip = %record.ip, error = %e, "failed to update cache tier");
            } else {
                trace!(cache = %cache.name, ip = %record.ip, "cache tier updated");
            }
        }))
        .await;
    }

    /// Probe every tier concurrently under a shared deadline and return the
    /// raw per-tier results. No aggregation happens here and no probe can
    /// mask another; a probe that exceeds the deadline is reported as a
    /// connection error for that tier.
    pub async fn statuses(&self, deadline: Duration) -> HashMap<String, Result<()>> {
        let probes = self.caches.iter().map(|cache| async move {
            let result = match tokio::time::timeout(deadline, cache.repository.status()).await {
                Ok(status) => status,
                Err(_) => Err(IpGeoError::cache_connection(format!(
                    "status probe for '{}' timed out",
                    cache.name
                ))),
            };

            (cache.name.clone(), result)
        });

        join_all(probes).await.into_iter().collect()
    }

    /// Number of registered tiers.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}
