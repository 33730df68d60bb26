use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{trace, warn};

use crate::cache::CacheChain;
use crate::geoapi::GeoApi;

pub const HEALTHZ_PASS: &str = "pass";
pub const HEALTHZ_FAIL: &str = "fail";

/// Shared deadline for all status probes of a single health request.
const STATUS_PROBE_DEADLINE: Duration = Duration::from_secs(2);

/// Health report: one entry per cache tier, plus the remote provider under
/// its own name. `status` is "fail" as soon as any check fails.
#[derive(Debug, Serialize)]
pub struct HealthzResponse {
    pub status: String,
    pub checks: HashMap<String, String>,
}

/// Health check service, backing the readiness and liveness probes.
///
/// Kept deliberately simple: probes fan out concurrently, the handler only
/// folds the raw per-check results into pass/fail.
pub struct HealthService;

impl HealthService {
    pub async fn healthz(
        chain: web::Data<Arc<CacheChain>>,
        geo_api: web::Data<Arc<dyn GeoApi>>,
    ) -> impl Responder {
        trace!("received health check request");

        let statuses = chain.statuses(STATUS_PROBE_DEADLINE).await;

        let mut checks = HashMap::with_capacity(statuses.len() + 1);
        let mut healthy = true;

        for (name, result) in statuses {
            match result {
                Ok(()) => {
                    checks.insert(name, HEALTHZ_PASS.to_string());
                }
                Err(e) => {
                    warn!(cache = %name, error = %e, "cache tier failed its status probe");
                    healthy = false;
                    checks.insert(name, HEALTHZ_FAIL.to_string());
                }
            }
        }

        let provider_status =
            match tokio::time::timeout(STATUS_PROBE_DEADLINE, geo_api.status()).await {
                Ok(Ok(())) => HEALTHZ_PASS,
                Ok(Err(e)) => {
                    warn!(provider = geo_api.name(), error = %e, "remote geolocation API failed its status probe");
                    healthy = false;
                    HEALTHZ_FAIL
                }
                Err(_) => {
                    warn!(provider = geo_api.name(), "remote geolocation API status probe timed out");
                    healthy = false;
                    HEALTHZ_FAIL
                }
            };
        checks.insert("remote_api".to_string(), provider_status.to_string());

        let status = if healthy { HEALTHZ_PASS } else { HEALTHZ_FAIL };
        let body = HealthzResponse {
            status: status.to_string(),
            checks,
        };

        if healthy {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }
}
