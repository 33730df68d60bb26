pub mod geo;
pub mod health;

pub use geo::GeoService;
pub use health::{HealthService, HealthzResponse};

use serde::Serialize;

/// JSON body returned for HTTP errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        Self {
            status: "error".to_string(),
            msg: msg.to_string(),
        }
    }
}
