pub mod chain;
pub mod memory;
pub mod redis;
pub mod traits;

pub use chain::CacheChain;
pub use memory::InMemoryCache;
pub use redis::RedisCache;
pub use traits::GeoRepository;
