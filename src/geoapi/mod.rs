//! Remote geolocation provider clients.
//!
//! The cache chain never talks to these: on a chain-wide miss the HTTP
//! layer consults the configured provider, then populates every tier with
//! the result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::config::GeoApiConfig;
use crate::errors::Result;
use crate::models::GeoRecord;

pub mod ip_api;
pub mod ipbase;

pub use ip_api::IpApiClient;
pub use ipbase::IpBaseClient;

/// A third-party geolocation source.
///
/// `get` errors on transport failure, a non-2xx response, or a payload
/// that cannot be mapped to a [`GeoRecord`].
#[async_trait]
pub trait GeoApi: Send + Sync {
    async fn get(&self, ip: &str) -> Result<GeoRecord>;

    /// Reachability probe of the provider, for health reporting.
    async fn status(&self) -> Result<()>;

    /// Provider name, for logs and the health report.
    fn name(&self) -> &'static str;
}

/// Build the provider selected in configuration.
///
/// Unknown provider names fall back to ip-api, which needs no API key.
pub fn from_config(cfg: &GeoApiConfig) -> Arc<dyn GeoApi> {
    let timeout = Duration::from_secs(cfg.http_timeout);

    match cfg.provider.as_str() {
        "ipbase" => Arc::new(IpBaseClient::new(
            &cfg.ipbase_base_url,
            &cfg.ipbase_api_key,
            timeout,
        )),
        "ip-api" => Arc::new(IpApiClient::new(&cfg.ip_api_base_url, timeout)),
        other => {
            warn!(
                "unknown geolocation provider '{}', falling back to ip-api",
                other
            );
            Arc::new(IpApiClient::new(&cfg.ip_api_base_url, timeout))
        }
    }
}
