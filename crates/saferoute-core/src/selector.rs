//! Route selector: rank evaluated candidate routes by aggregate safety.

use crate::error::CoreError;
use crate::models::{CandidateRoute, RankedAlternative, RouteRanking, TradeOff};
use std::cmp::Ordering;

/// Rank candidates ascending by `average_point_score` (lower is safer).
///
/// Ties break by shorter distance, then shorter duration, then original
/// input order — the sort is stable, so equal keys keep their submission
/// order. Candidates without a computed report are dropped; if none
/// remain, the caller gets [`CoreError::NoRouteAvailable`] rather than an
/// arbitrary guess.
pub fn select(routes: Vec<CandidateRoute>) -> Result<RouteRanking, CoreError> {
    let mut evaluated: Vec<CandidateRoute> = routes
        .into_iter()
        .filter(|route| route.report.is_some())
        .collect();

    if evaluated.is_empty() {
        return Err(CoreError::NoRouteAvailable);
    }

    evaluated.sort_by(compare_routes);

    let mut iter = evaluated.into_iter();
    let recommended = iter.next().expect("non-empty after the guard above");
    let recommended_score = average_score(&recommended);

    let alternatives = iter
        .map(|route| {
            let trade_off = TradeOff {
                extra_distance_km: route.distance_km - recommended.distance_km,
                extra_duration_min: route.duration_min - recommended.duration_min,
                score_delta: average_score(&route) - recommended_score,
            };
            RankedAlternative { route, trade_off }
        })
        .collect();

    Ok(RouteRanking {
        recommended,
        alternatives,
    })
}

fn average_score(route: &CandidateRoute) -> f64 {
    route
        .report
        .as_ref()
        .map(|report| report.average_point_score)
        .unwrap_or(f64::INFINITY)
}

fn compare_routes(a: &CandidateRoute, b: &CandidateRoute) -> Ordering {
    average_score(a)
        .total_cmp(&average_score(b))
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        .then_with(|| a.duration_min.total_cmp(&b.duration_min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteSafetyReport;

    fn candidate(id: &str, score: f64, distance_km: f64, duration_min: f64) -> CandidateRoute {
        CandidateRoute {
            route_id: id.to_string(),
            coordinates: Vec::new(),
            distance_km,
            duration_min,
            report: Some(RouteSafetyReport {
                total_unique_incidents: 0,
                average_point_score: score,
                max_point_score: score,
                safety_points: Vec::new(),
                sampled_point_count: 0,
                failures: Vec::new(),
            }),
        }
    }

    #[test]
    fn ranks_by_score_then_distance() {
        let routes = vec![
            candidate("a", 5.0, 10.0, 20.0),
            candidate("b", 2.0, 12.0, 18.0),
            candidate("c", 2.0, 8.0, 25.0),
        ];
        let ranking = select(routes).unwrap();
        // Score tie between b and c breaks on the shorter 8km distance.
        assert_eq!(ranking.recommended.route_id, "c");
        let order: Vec<_> = ranking
            .alternatives
            .iter()
            .map(|alt| alt.route.route_id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn full_tie_keeps_input_order() {
        let routes = vec![
            candidate("first", 1.0, 5.0, 10.0),
            candidate("second", 1.0, 5.0, 10.0),
        ];
        let ranking = select(routes).unwrap();
        assert_eq!(ranking.recommended.route_id, "first");
        assert_eq!(ranking.alternatives[0].route.route_id, "second");
    }

    #[test]
    fn duration_breaks_distance_tie() {
        let routes = vec![
            candidate("slow", 1.0, 5.0, 30.0),
            candidate("fast", 1.0, 5.0, 10.0),
        ];
        let ranking = select(routes).unwrap();
        assert_eq!(ranking.recommended.route_id, "fast");
    }

    #[test]
    fn unevaluated_routes_are_dropped() {
        let mut failed = candidate("failed", 0.0, 1.0, 1.0);
        failed.report = None;
        let routes = vec![failed, candidate("ok", 3.0, 2.0, 2.0)];
        let ranking = select(routes).unwrap();
        assert_eq!(ranking.recommended.route_id, "ok");
        assert!(ranking.alternatives.is_empty());
    }

    #[test]
    fn all_failed_is_an_error() {
        let mut a = candidate("a", 0.0, 1.0, 1.0);
        a.report = None;
        let mut b = candidate("b", 0.0, 1.0, 1.0);
        b.report = None;
        assert!(matches!(
            select(vec![a, b]),
            Err(CoreError::NoRouteAvailable)
        ));
        assert!(matches!(select(Vec::new()), Err(CoreError::NoRouteAvailable)));
    }

    #[test]
    fn trade_offs_are_relative_to_recommended() {
        let routes = vec![
            candidate("safe", 2.0, 8.0, 25.0),
            candidate("short", 5.0, 6.0, 15.0),
        ];
        let ranking = select(routes).unwrap();
        assert_eq!(ranking.recommended.route_id, "safe");
        let alt = &ranking.alternatives[0];
        assert!((alt.trade_off.extra_distance_km + 2.0).abs() < 1e-9);
        assert!((alt.trade_off.extra_duration_min + 10.0).abs() < 1e-9);
        assert!((alt.trade_off.score_delta - 3.0).abs() < 1e-9);
    }
}
