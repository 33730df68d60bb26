//! Client for the https://api.ipbase.com/v2 API.
//!
//! Documentation: https://ipbase.com/docs/info

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};
use ureq::Agent;

use super::GeoApi;
use crate::errors::{IpGeoError, Result};
use crate::models::GeoRecord;

pub const DEFAULT_BASE_URL: &str = "https://api.ipbase.com/v2/info?ip=";

pub struct IpBaseClient {
    base_url: String,
    api_key: String,
    agent: Agent,
}

impl IpBaseClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            base_url.to_string()
        };

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url,
            api_key: api_key.to_string(),
            agent,
        }
    }

    fn make_url(&self, ip: &str) -> String {
        format!("{}{}&apikey={}&language=en", self.base_url, ip, self.api_key)
    }

    /// Same URL with the API key redacted, safe for logs.
    fn make_url_redacted(&self, ip: &str) -> String {
        format!("{}{}&apikey=xxxxxx&language=en", self.base_url, ip)
    }

    fn fetch_sync(agent: &Agent, url: &str, url_redacted: &str) -> Result<serde_json::Value> {
        let resp = agent.get(url).call().map_err(|e| {
            IpGeoError::remote_api(format!(
                "http request to \"{}\" failed: {}",
                url_redacted, e
            ))
        })?;

        resp.into_body().read_json().map_err(|e| {
            IpGeoError::remote_api(format!(
                "reading response from \"{}\" failed: {}",
                url_redacted, e
            ))
        })
    }

    /// Map an ipbase.com payload onto a [`GeoRecord`]. The fields of
    /// interest sit under `data.location`.
    fn parse_response(ip: &str, json: &serde_json::Value) -> Result<GeoRecord> {
        let location = &json["data"]["location"];
        if location.is_null() {
            return Err(IpGeoError::remote_api(format!(
                "ipbase response for '{}' carries no location data",
                ip
            )));
        }

        Ok(GeoRecord {
            ip: ip.to_string(),
            country_code: location["country"]["alpha2"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            country_name: location["country"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            city: location["city"]["name"].as_str().unwrap_or_default().to_string(),
            latitude: location["latitude"].as_f64().unwrap_or(0.0),
            longitude: location["longitude"].as_f64().unwrap_or(0.0),
        })
    }
}

#[async_trait]
impl GeoApi for IpBaseClient {
    async fn get(&self, ip: &str) -> Result<GeoRecord> {
        let url = self.make_url(ip);
        let url_redacted = self.make_url_redacted(ip);
        let agent = self.agent.clone();

        debug!("sending http request to {}", url_redacted);
        let json = tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, &url, &url_redacted))
            .await
            .map_err(|e| IpGeoError::remote_api(format!("geolocation lookup task failed: {}", e)))??;

        trace!("parsing ipbase response for {}", ip);
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
        "ipbase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{
                "data": {
                    "ip": "1.1.1.1",
                    "type": "v4",
                    "location": {
                        "geonames_id": 2207259,
                        "latitude": -27.4766,
                        "longitude": 153.0166,
                        "zip": "4101",
                        "continent": {"code": "OC", "name": "Oceania"},
                        "country": {"alpha2": "AU", "alpha3": "AUS", "name": "Australia"},
                        "city": {"name": "South Brisbane"},
                        "region": {"alpha2": "AU-QLD", "name": "Queensland"}
                    }
                }
            }"#,
        )
        .unwrap();

        let record = IpBaseClient::parse_response("1.1.1.1", &json).unwrap();
        assert_eq!(record.ip, "1.1.1.1");
        assert_eq!(record.country_code, "AU");
        assert_eq!(record.country_name, "Australia");
        assert_eq!(record.city, "South Brisbane");
        assert_eq!(record.latitude, -27.4766);
        assert_eq!(record.longitude, 153.0166);
    }

    #[test]
    fn test_parse_response_without_location() {
        let json: serde_json::Value = serde_json::from_str(r#"{"data": {}}"#).unwrap();

        let err = IpBaseClient::parse_response("1.1.1.1", &json).unwrap_err();
        assert!(matches!(err, IpGeoError::RemoteApi(_)));
    }

    #[test]
    fn test_api_key_is_redacted_from_log_url() {
        let client = IpBaseClient::new("", "super-secret", Duration::from_secs(2));

        assert!(client.make_url("1.1.1.1").contains("super-secret"));
        assert!(!client.make_url_redacted("1.1.1.1").contains("super-secret"));
    }
}
