//! Route safety evaluation: sample points along a polyline, query the
//! incident source around each with a bounded worker pool, and fold the
//! joined results into one report.

use crate::config::EngineConfig;
use crate::providers::IncidentSource;
use futures::stream::{self, StreamExt as _};
use saferoute_core::{
    scorer, CandidateRoute, CoreError, Coordinate, QueryFailure, RouteRanking, RouteSafetyReport,
    SafetyPoint,
};
use std::collections::HashSet;
use std::time::Instant;

/// At most this many points are sampled per route.
const MAX_SAMPLE_POINTS: usize = 20;

fn sample_indices(route_len: usize) -> impl Iterator<Item = usize> {
    let stride = (route_len / MAX_SAMPLE_POINTS).max(1);
    (0..route_len).step_by(stride)
}

enum PointResult {
    Incidents(Vec<saferoute_core::IncidentRecord>),
    Failed(String),
}

/// Evaluate one route polyline against the incident source.
///
/// Every sampled point is queried with the configured buffer radius; the
/// queries run at most `config.concurrency` at a time and the report is
/// built only after all of them settle. A failed query degrades its point
/// to zero incidents and zero score, with the failure recorded in the
/// report; the evaluation itself never errors.
pub async fn evaluate_route<S>(
    route: &[Coordinate],
    source: &S,
    config: &EngineConfig,
    deadline: Option<Instant>,
) -> RouteSafetyReport
where
    S: IncidentSource + ?Sized,
{
    let samples: Vec<(usize, Coordinate)> = sample_indices(route.len())
        .map(|i| (i, route[i]))
        .collect();

    let radius_km = config.buffer_km;
    let since = config.incident_since;
    let call_timeout = config.call_timeout;
    let concurrency = config.concurrency.max(1);

    let mut results: Vec<(usize, Coordinate, PointResult)> =
        stream::iter(samples.into_iter().map(|(route_index, coordinate)| async move {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return (route_index, coordinate, PointResult::Failed("deadline exceeded".to_string()));
            }
            let call = source.query(coordinate, radius_km, since);
            let result = match call_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, call).await {
                    Ok(result) => result,
                    Err(_) => {
                        return (route_index, coordinate, PointResult::Failed("timed out".to_string()))
                    }
                },
                None => call.await,
            };
            let point = match result {
                Ok(incidents) => PointResult::Incidents(incidents),
                Err(err) => PointResult::Failed(err.to_string()),
            };
            (route_index, coordinate, point)
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    // Completion order is arbitrary; reports list points in route order.
    results.sort_by_key(|(route_index, _, _)| *route_index);

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut safety_points = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (route_index, coordinate, point) in results {
        match point {
            PointResult::Incidents(incidents) => {
                for incident in &incidents {
                    seen_ids.insert(incident.id.clone());
                }
                safety_points.push(SafetyPoint {
                    route_index,
                    coordinate,
                    incident_count: incidents.len(),
                    score: scorer::score_incidents(&incidents),
                });
            }
            PointResult::Failed(message) => {
                tracing::warn!(route_index, %message, "incident query failed; point scored as zero");
                failures.push(QueryFailure {
                    route_index,
                    message,
                });
                safety_points.push(SafetyPoint {
                    route_index,
                    coordinate,
                    incident_count: 0,
                    score: 0.0,
                });
            }
        }
    }

    let sampled_point_count = safety_points.len();
    let average_point_score = if sampled_point_count == 0 {
        0.0
    } else {
        safety_points.iter().map(|p| p.score).sum::<f64>() / sampled_point_count as f64
    };
    let max_point_score = safety_points
        .iter()
        .map(|p| p.score)
        .fold(0.0_f64, f64::max);

    RouteSafetyReport {
        total_unique_incidents: seen_ids.len(),
        average_point_score,
        max_point_score,
        sampled_point_count,
        safety_points,
        failures,
    }
}

/// Evaluate each candidate in turn and attach its safety report.
///
/// Candidates with an empty polyline are left unevaluated and are skipped
/// by the selector.
pub async fn evaluate_candidates<S>(
    mut routes: Vec<CandidateRoute>,
    source: &S,
    config: &EngineConfig,
    deadline: Option<Instant>,
) -> Vec<CandidateRoute>
where
    S: IncidentSource + ?Sized,
{
    for route in &mut routes {
        if route.coordinates.is_empty() {
            tracing::warn!(route_id = %route.route_id, "candidate has no coordinates; skipping evaluation");
            continue;
        }
        route.report = Some(evaluate_route(&route.coordinates, source, config, deadline).await);
    }
    routes
}

/// Evaluate and rank a set of candidate routes in one call.
pub async fn recommend_route<S>(
    routes: Vec<CandidateRoute>,
    source: &S,
    config: &EngineConfig,
    deadline: Option<Instant>,
) -> Result<RouteRanking, CoreError>
where
    S: IncidentSource + ?Sized,
{
    let evaluated = evaluate_candidates(routes, source, config, deadline).await;
    saferoute_core::selector::select(evaluated)
}

#[cfg(test)]
mod tests {
    use super::sample_indices;

    #[test]
    fn short_routes_sample_every_point() {
        let indices: Vec<usize> = sample_indices(7).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn long_routes_cap_near_twenty_samples() {
        let indices: Vec<usize> = sample_indices(100).collect();
        assert_eq!(indices.len(), 20);
        assert_eq!(indices[0], 0);
        assert_eq!(*indices.last().unwrap(), 95);
    }

    #[test]
    fn twenty_one_points_sample_all() {
        // 21 / 20 == 1, so the stride stays 1 and all points are sampled.
        let indices: Vec<usize> = sample_indices(21).collect();
        assert_eq!(indices.len(), 21);
    }

    #[test]
    fn empty_route_samples_nothing() {
        assert_eq!(sample_indices(0).count(), 0);
    }
}
