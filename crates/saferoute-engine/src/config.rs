//! Engine configuration from explicit values or the environment.

use chrono::{DateTime, Utc};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Grid dimensions for planning calls. Both must be >= 2.
    pub n_lat: usize,
    pub n_lon: usize,
    /// Weight of physical distance in the edge cost, >= 0.
    pub distance_weight: f64,
    /// Hard budget on hazard provider calls per planning call. `None`
    /// samples every node.
    pub max_calls: Option<usize>,
    /// Worker-pool width for provider fan-out. Bounded to respect
    /// third-party rate limits.
    pub concurrency: usize,
    /// Incident search radius around each route sample point.
    pub buffer_km: f64,
    /// Only count incidents reported at or after this instant.
    pub incident_since: Option<DateTime<Utc>>,
    /// Per-call provider timeout. A timed-out call degrades that node or
    /// sample rather than the whole run.
    pub call_timeout: Option<Duration>,
    pub cache_max_age: Duration,
    pub cache_max_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_lat: 20,
            n_lon: 20,
            distance_weight: 0.1,
            max_calls: None,
            concurrency: 8,
            buffer_km: 0.2,
            incident_since: None,
            call_timeout: Some(Duration::from_secs(10)),
            cache_max_age: Duration::from_secs(300),
            cache_max_entries: 50_000,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `SAFEROUTE_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            n_lat: env_parse("SAFEROUTE_GRID_N_LAT").unwrap_or(defaults.n_lat),
            n_lon: env_parse("SAFEROUTE_GRID_N_LON").unwrap_or(defaults.n_lon),
            distance_weight: env_parse("SAFEROUTE_DISTANCE_WEIGHT")
                .unwrap_or(defaults.distance_weight),
            max_calls: env_parse("SAFEROUTE_MAX_CALLS"),
            concurrency: env_parse::<usize>("SAFEROUTE_CONCURRENCY")
                .map(|n| n.max(1))
                .unwrap_or(defaults.concurrency),
            buffer_km: env_parse("SAFEROUTE_BUFFER_KM").unwrap_or(defaults.buffer_km),
            incident_since: env::var("SAFEROUTE_INCIDENTS_SINCE")
                .ok()
                .and_then(|s| s.parse::<DateTime<Utc>>().ok()),
            call_timeout: env_parse::<u64>("SAFEROUTE_CALL_TIMEOUT_S")
                .map(Duration::from_secs)
                .or(defaults.call_timeout),
            cache_max_age: env_parse::<u64>("SAFEROUTE_CACHE_TTL_S")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_max_age),
            cache_max_entries: env_parse("SAFEROUTE_CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
