//! Cache chain lookup benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use std::sync::Arc;

use ipgeo::cache::{CacheChain, InMemoryCache};
use ipgeo::models::GeoRecord;

fn record(ip: &str) -> GeoRecord {
    GeoRecord {
        ip: ip.to_string(),
        country_code: "AU".to_string(),
        country_name: "Australia".to_string(),
        city: "South Brisbane".to_string(),
        latitude: -27.4766,
        longitude: 153.0166,
    }
}

fn bench_chain_get_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mem = Arc::new(InMemoryCache::new());
    let mut chain = CacheChain::new();
    chain.add("in-memory", mem).unwrap();
    let chain = Arc::new(chain);

    rt.block_on(async {
        for i in 0..1000 {
            chain
                .save_in_all_caches(&record(&format!("10.0.{}.{}", i / 256, i % 256)))
                .await;
        }
    });

    let chain_hit = Arc::clone(&chain);
    c.bench_function("chain/get_hit", |b| {
        b.to_async(&rt).iter(|| {
            let chain = Arc::clone(&chain_hit);
            async move { chain.get("10.0.1.244").await.unwrap() }
        });
    });
}

fn bench_chain_get_miss(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mem = Arc::new(InMemoryCache::new());
    let mut chain = CacheChain::new();
    chain.add("in-memory", mem).unwrap();
    let chain = Arc::new(chain);

    c.bench_function("chain/get_miss", |b| {
        b.to_async(&rt).iter(|| {
            let chain = Arc::clone(&chain);
            async move { chain.get("203.0.113.1").await.unwrap_err() }
        });
    });
}

fn bench_chain_save_in_all_caches(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut chain = CacheChain::new();
    chain.add("l1", Arc::new(InMemoryCache::new())).unwrap();
    chain.add("l2", Arc::new(InMemoryCache::new())).unwrap();
    let chain = Arc::new(chain);
    let r = record("1.1.1.1");

    c.bench_function("chain/save_in_all_caches", |b| {
        b.to_async(&rt).iter(|| {
            let chain = Arc::clone(&chain);
            let r = r.clone();
            async move { chain.save_in_all_caches(&r).await }
        });
    });
}

criterion_group!(
    benches,
    bench_chain_get_hit,
    bench_chain_get_miss,
    bench_chain_save_in_all_caches
);
criterion_main!(benches);
