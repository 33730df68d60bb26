//! ipgeo - an IPv4 geolocation lookup service
//!
//! Given an IPv4 address, ipgeo returns country/city/coordinate
//! information, consulting a layered cache chain before falling back to a
//! remote third-party geolocation provider.
//!
//! # Architecture
//! - `cache`: the cache chain and its tiers (in-memory map, Redis)
//! - `geoapi`: remote geolocation provider clients (ip-api, ipbase)
//! - `api`: HTTP services and middleware
//! - `config`: configuration management
//! - `system`: logging initialization
//! - `models`: the record type flowing through every layer

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod geoapi;
pub mod models;
pub mod system;
pub mod utils;
