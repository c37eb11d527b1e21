//! Plan a path across a synthetic hazard field and print the result as
//! JSON.
//!
//! Run with: cargo run -p saferoute-engine --example plan_demo

use anyhow::Result;
use async_trait::async_trait;
use saferoute_engine::{
    plan_safe_path, Coordinate, EngineConfig, HazardCache, HazardProvider,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Synthetic hazard field: a dangerous ridge along one longitude band,
/// calm everywhere else.
struct RidgeProvider;

#[async_trait]
impl HazardProvider for RidgeProvider {
    async fn hazard(
        &self,
        coordinate: Coordinate,
    ) -> Result<f64, saferoute_engine::ProviderError> {
        let ridge = (-77.035..-77.025).contains(&coordinate.lon);
        Ok(if ridge { 25.0 } else { 1.0 })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("saferoute_engine=debug".parse()?),
        )
        .init();

    let start = Coordinate {
        lat: 38.895,
        lon: -77.05,
    };
    let end = Coordinate {
        lat: 38.905,
        lon: -77.01,
    };

    let config = EngineConfig::from_env();
    let cache = HazardCache::new(config.cache_max_age, config.cache_max_entries);

    let outcome = plan_safe_path(start, end, &RidgeProvider, Some(&cache), &config, None).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    // A second plan over the same area is served from the cache.
    let again = plan_safe_path(start, end, &RidgeProvider, Some(&cache), &config, None).await?;
    tracing::info!(
        cache_hits = again.sampling.cache_hits,
        "replanned from cache"
    );

    Ok(())
}
