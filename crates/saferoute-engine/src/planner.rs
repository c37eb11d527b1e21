//! End-to-end planning: build the grid around the endpoints, sample it
//! through the hazard provider, then run the shortest-path search.

use crate::cache::HazardCache;
use crate::config::EngineConfig;
use crate::providers::HazardProvider;
use crate::sampler::{self, SampleOutcome};
use saferoute_core::{planner, CoreError, Coordinate, HazardGrid, PathResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A path search result together with its sampling diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub result: PathResult,
    pub sampling: SampleOutcome,
}

/// Plan a hazard-aware path from `start` to `end`.
///
/// Grid sizing, the call budget, concurrency, and the distance weight all
/// come from `config`; `cache` is shared across calls by the caller and
/// may be omitted. Returns `Err` only for invalid inputs; a blocked or
/// unsampled grid comes back as `PathResult::NotFound` with diagnostics.
pub async fn plan_safe_path<P>(
    start: Coordinate,
    end: Coordinate,
    provider: &P,
    cache: Option<&HazardCache>,
    config: &EngineConfig,
    deadline: Option<Instant>,
) -> Result<PlanOutcome, CoreError>
where
    P: HazardProvider + ?Sized,
{
    let mut grid = HazardGrid::build(start, end, config.n_lat, config.n_lon)?;
    let sampling = sampler::sample_grid(&mut grid, provider, cache, config, deadline).await;

    tracing::info!(
        grid_shape = ?grid.shape(),
        calls_made = sampling.calls_made,
        cache_hits = sampling.cache_hits,
        failures = sampling.failures.len(),
        abandoned = sampling.abandoned,
        "grid sampled"
    );

    let result = planner::plan(&grid, start, end, config.distance_weight)?;
    if let PathResult::NotFound { .. } = &result {
        tracing::warn!(?start, ?end, "no traversable path through sampled grid");
    }

    Ok(PlanOutcome { result, sampling })
}
