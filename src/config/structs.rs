use serde::{Deserialize, Serialize};

/// Static configuration, loaded once at startup.
///
/// Sources, in priority order: environment variables (prefix `IPGEO`,
/// separator `__`, e.g. `IPGEO__SERVER__PORT=9999`) over an optional
/// `config.toml` over the serde defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub geoapi: GeoApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("IPGEO")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

/// Cache chain configuration.
///
/// The in-memory tier is always registered first. The Redis tier is
/// registered behind it when `redis.enabled` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL in seconds applied to every save in the Redis tier.
    #[serde(default = "default_cache_ttl")]
    pub default_ttl: u64,
    #[serde(default)]
    pub redis: RedisConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_cache_ttl(),
            redis: RedisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

/// Remote geolocation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoApiConfig {
    /// Which provider to query on a chain-wide miss: "ip-api" or "ipbase".
    #[serde(default = "default_geoapi_provider")]
    pub provider: String,
    #[serde(default = "default_ip_api_base_url")]
    pub ip_api_base_url: String,
    #[serde(default = "default_ipbase_base_url")]
    pub ipbase_base_url: String,
    #[serde(default)]
    pub ipbase_api_key: String,
    /// Global timeout in seconds for outbound provider requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,
}

impl Default for GeoApiConfig {
    fn default() -> Self {
        Self {
            provider: default_geoapi_provider(),
            ip_api_base_url: default_ip_api_base_url(),
            ipbase_base_url: default_ipbase_base_url(),
            ipbase_api_key: String::new(),
            http_timeout: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing env-filter directive, e.g. "info" or "ipgeo=trace,info".
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file path; empty or absent means stdout.
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

// 24 hours, matching the TTL the Redis tier has always applied.
fn default_cache_ttl() -> u64 {
    86400
}

fn default_redis_enabled() -> bool {
    true
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_key_prefix() -> String {
    "ipgeo:".to_string()
}

fn default_geoapi_provider() -> String {
    "ip-api".to_string()
}

// https isn't available for free usage
fn default_ip_api_base_url() -> String {
    "http://ip-api.com/json/".to_string()
}

fn default_ipbase_base_url() -> String {
    "https://api.ipbase.com/v2/info?ip=".to_string()
}

fn default_http_timeout() -> u64 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}
