use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::{Instrument, debug, error, trace};

use super::ErrorResponse;
use crate::cache::CacheChain;
use crate::errors::IpGeoError;
use crate::geoapi::GeoApi;
use crate::utils::is_ipv4;

/// Geolocation lookup service.
pub struct GeoService;

impl GeoService {
    /// Main lookup handler: `GET /rest/v1/{ip}`.
    ///
    /// Validates the path segment is a dotted-quad IPv4 address, then asks
    /// the cache chain. On a chain-wide miss the remote provider is
    /// consulted and every tier is populated in the background; the
    /// response does not wait for the saves.
    pub async fn get_geo_ip(
        path: web::Path<String>,
        chain: web::Data<Arc<CacheChain>>,
        geo_api: web::Data<Arc<dyn GeoApi>>,
    ) -> impl Responder {
        let ip = path.into_inner();
        trace!(ip = %ip, "received geolocation lookup request");

        if !is_ipv4(&ip) {
            let err = IpGeoError::validation(format!("'{}' is not a valid IPv4 address", ip));
            debug!(ip = %ip, error = %err, "rejecting lookup request");
            return HttpResponse::BadRequest().json(ErrorResponse::new(err.message()));
        }

        match chain.get(&ip).await {
            Ok(record) => HttpResponse::Ok().json(record),
            Err(e) => {
                debug!(ip = %ip, error = %e, "cache chain miss, querying remote geolocation API");

                match geo_api.get(&ip).await {
                    Ok(record) => {
                        // Fire-and-forget: populate every tier without
                        // delaying the response.
                        let chain = chain.clone();
                        let saved = record.clone();
                        tokio::spawn(
                            async move {
                                chain.save_in_all_caches(&saved).await;
                            }
                            .in_current_span(),
                        );

                        HttpResponse::Ok().json(record)
                    }
                    Err(e) => {
                        error!(ip = %ip, error = %e, "failed to retrieve geolocation information");
                        HttpResponse::InternalServerError()
                            .json(ErrorResponse::new("couldn't retrieve geo IP information"))
                    }
                }
            }
        }
    }
}
