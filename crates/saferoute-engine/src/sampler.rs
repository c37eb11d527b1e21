//! Grid sampling driver: fan hazard queries out over a bounded worker
//! pool and join before any aggregation.
//!
//! Budget semantics: nodes are considered in row-major order; the first
//! `max_calls` cache misses are issued to the provider and every node past
//! the budget keeps the +inf sentinel without the provider ever being
//! touched. A per-node failure or timeout degrades that node alone.

use crate::cache::HazardCache;
use crate::config::EngineConfig;
use crate::providers::HazardProvider;
use futures::stream::{self, StreamExt as _};
use saferoute_core::{Coordinate, HazardGrid};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One node whose provider call failed and was degraded to +inf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFailure {
    pub node: (usize, usize),
    pub message: String,
}

/// What happened while sampling one grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleOutcome {
    /// Provider calls actually issued.
    pub calls_made: usize,
    /// Nodes served from the shared cache.
    pub cache_hits: usize,
    /// Scheduled queries abandoned unsent because the deadline passed.
    pub abandoned: usize,
    pub failures: Vec<SampleFailure>,
}

enum CallResult {
    Value(f64),
    Failed(String),
    Abandoned,
}

/// Sample hazard values into `grid`.
///
/// All queries for the call complete (or are marked failed) before this
/// returns; the grid is usable by the planner immediately afterwards.
/// Exceeding `deadline` mid-run abandons unsent queries and returns the
/// partial grid rather than discarding work.
pub async fn sample_grid<P>(
    grid: &mut HazardGrid,
    provider: &P,
    cache: Option<&HazardCache>,
    config: &EngineConfig,
    deadline: Option<Instant>,
) -> SampleOutcome
where
    P: HazardProvider + ?Sized,
{
    let mut outcome = SampleOutcome::default();
    let mut scheduled: Vec<(usize, usize, Coordinate)> = Vec::new();

    for (i, j) in grid.node_indices().collect::<Vec<_>>() {
        let coordinate = grid.node_coordinate(i, j);
        if let Some(hazard) = cache.and_then(|c| c.get(coordinate)) {
            grid.set_hazard(i, j, hazard);
            outcome.cache_hits += 1;
            continue;
        }
        if let Some(budget) = config.max_calls {
            if scheduled.len() >= budget {
                // Budget exhausted: the node keeps its +inf sentinel.
                continue;
            }
        }
        scheduled.push((i, j, coordinate));
    }

    if let Some(budget) = config.max_calls {
        tracing::debug!(
            scheduled = scheduled.len(),
            budget,
            nodes = grid.node_count(),
            "grid sampling under call budget"
        );
    }

    let concurrency = config.concurrency.max(1);
    let call_timeout = config.call_timeout;
    let results: Vec<((usize, usize, Coordinate), CallResult)> =
        stream::iter(scheduled.into_iter().map(|(i, j, coordinate)| async move {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return ((i, j, coordinate), CallResult::Abandoned);
            }
            let call = provider.hazard(coordinate);
            let result = match call_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, call).await {
                    Ok(result) => result,
                    Err(_) => {
                        return ((i, j, coordinate), CallResult::Failed("timed out".to_string()))
                    }
                },
                None => call.await,
            };
            let call_result = match result {
                Ok(hazard) if hazard.is_finite() => CallResult::Value(hazard),
                Ok(hazard) => CallResult::Failed(format!("non-finite hazard {hazard}")),
                Err(err) => CallResult::Failed(err.to_string()),
            };
            ((i, j, coordinate), call_result)
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    for ((i, j, coordinate), result) in results {
        match result {
            CallResult::Value(hazard) => {
                outcome.calls_made += 1;
                grid.set_hazard(i, j, hazard);
                if let Some(cache) = cache {
                    cache.insert(coordinate, hazard);
                }
            }
            CallResult::Failed(message) => {
                outcome.calls_made += 1;
                tracing::warn!(node = ?(i, j), %message, "hazard sample failed; node degraded to +inf");
                outcome.failures.push(SampleFailure {
                    node: (i, j),
                    message,
                });
            }
            CallResult::Abandoned => {
                outcome.abandoned += 1;
            }
        }
    }

    grid.set_calls_made(outcome.calls_made);
    outcome
}
