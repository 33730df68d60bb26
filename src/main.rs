use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use ipgeo::api::middleware::RequestIdMiddleware;
use ipgeo::api::services::{GeoService, HealthService};
use ipgeo::cache::{CacheChain, InMemoryCache, RedisCache};
use ipgeo::config::{get_config, init_config};
use ipgeo::errors::IpGeoError;
use ipgeo::geoapi::{self, GeoApi};
use ipgeo::system::logging::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_config();
    let config = get_config();

    // Keep the guard alive: dropping it stops the non-blocking log writer.
    let _log_guard = init_logging(&config.logging);

    // Build the cache chain, fastest tier first. A registration error means
    // broken startup wiring, not a degraded tier: abort.
    let mut chain = CacheChain::new();
    chain
        .add("in-memory", Arc::new(InMemoryCache::new()))
        .unwrap_or_else(|e| fatal(e));

    if config.cache.redis.enabled {
        let redis = RedisCache::new(
            &config.cache.redis.url,
            &config.cache.redis.key_prefix,
            config.cache.default_ttl,
        )
        .unwrap_or_else(|e| fatal(e));
        chain
            .add("redis", Arc::new(redis))
            .unwrap_or_else(|e| fatal(e));
    }
    info!("cache chain ready with {} tier(s)", chain.len());

    let chain = Arc::new(chain);
    let geo_api: Arc<dyn GeoApi> = geoapi::from_config(&config.geoapi);
    info!("using geolocation provider: {}", geo_api.name());

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(chain.clone()))
            .app_data(web::Data::new(geo_api.clone()))
            .wrap(RequestIdMiddleware)
            .route("/rest/v1/{ip}", web::get().to(GeoService::get_geo_ip))
            .route("/rest/v1/{ip}", web::head().to(GeoService::get_geo_ip))
            .route("/ready", web::get().to(HealthService::healthz))
            .route("/ready", web::head().to(HealthService::healthz))
            .route("/alive", web::get().to(HealthService::healthz))
            .route("/alive", web::head().to(HealthService::healthz))
    })
    .workers(config.server.cpu_count)
    .bind(bind_address)?
    .run()
    .await
}

fn fatal(e: IpGeoError) -> ! {
    eprintln!("{}", e.format_colored());
    std::process::exit(1);
}
