//! Client for the http://ip-api.com/ JSON API.
//!
//! Documentation: https://ip-api.com/docs/api:json

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};
use ureq::Agent;

use super::GeoApi;
use crate::errors::{IpGeoError, Result};
use crate::models::GeoRecord;

// https isn't available for free usage
pub const DEFAULT_BASE_URL: &str = "http://ip-api.com/json/";

pub struct IpApiClient {
    base_url: String,
    agent: Agent,
}

impl IpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            base_url.to_string()
        };

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self { base_url, agent }
    }

    /// Blocking fetch, run on the blocking thread pool. The agent's global
    /// timeout bounds the whole call; ureq surfaces non-2xx statuses as
    /// errors.
    fn fetch_sync(agent: &Agent, url: &str) -> Result<serde_json::Value> {
        let resp = agent
            .get(url)
            .call()
            .map_err(|e| IpGeoError::remote_api(format!("http request to \"{}\" failed: {}", url, e)))?;

        resp.into_body()
            .read_json()
            .map_err(|e| IpGeoError::remote_api(format!("reading response from \"{}\" failed: {}", url, e)))
    }

    /// Map an ip-api.com payload onto a [`GeoRecord`].
    ///
    /// Failed lookups come back as 200 with `{"status": "fail", ...}`.
    fn parse_response(ip: &str, json: &serde_json::Value) -> Result<GeoRecord> {
        if json["status"].as_str() == Some("fail") {
            let message = json["message"].as_str().unwrap_or("unknown reason");
            return Err(IpGeoError::remote_api(format!(
                "ip-api lookup for '{}' failed: {}",
                ip, message
            )));
        }

        Ok(GeoRecord {
            ip: ip.to_string(),
            country_code: json["countryCode"].as_str().unwrap_or_default().to_string(),
            country_name: json["country"].as_str().unwrap_or_default().to_string(),
            city: json["city"].as_str().unwrap_or_default().to_string(),
            latitude: json["lat"].as_f64().unwrap_or(0.0),
            longitude: json["lon"].as_f64().unwrap_or(0.0),
        })
    }
}

#[async_trait]
impl GeoApi for IpApiClient {
    async fn get(&self, ip: &str) -> Result<GeoRecord> {
        let url = format!("{}{}", self.base_url, ip);
        let agent = self.agent.clone();

        debug!("sending http request to {}", url);
        let json = tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, &url))
            .await
            .map_err(|e| IpGeoError::remote_api(format!("geolocation lookup task failed: {}", e)))??;

        trace!("parsing ip-api response for {}", ip);
        Self::parse_response(ip, &json)
    }

    async fn status(&self) -> Result<()> {
        let url = self.base_url.clone();
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || {
            agent.get(&url).call().map(|_| ()).map_err(|e| {
                IpGeoError::remote_api(format!("http request to \"{}\" failed: {}", url, e))
            })
        })
        .await
        .map_err(|e| IpGeoError::remote_api(format!("status probe task failed: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "ip-api"
    }
}
