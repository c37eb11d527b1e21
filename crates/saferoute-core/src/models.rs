//! Core data models for the safe-route system.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the WGS84 domain.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        if !lat.is_finite() || !lon.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

// ========== INCIDENT MODELS ==========

/// Severity class assigned to an incident from its casualty outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    PropertyDamage,
    MinorInjury,
    MajorInjury,
    Fatal,
}

impl IncidentSeverity {
    /// Classify from casualty counts: any fatality wins, then major, then minor.
    pub fn from_casualties(casualties: &Casualties) -> Self {
        let totals = casualties.totals();
        if totals.fatal > 0 {
            Self::Fatal
        } else if totals.major > 0 {
            Self::MajorInjury
        } else if totals.minor > 0 {
            Self::MinorInjury
        } else {
            Self::PropertyDamage
        }
    }
}

/// Casualty counts for one road-user category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasualtyCounts {
    #[serde(default)]
    pub fatal: u32,
    #[serde(default)]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
}

impl CasualtyCounts {
    fn add(&mut self, other: &CasualtyCounts) {
        self.fatal += other.fatal;
        self.major += other.major;
        self.minor += other.minor;
    }
}

/// Casualties broken down by road-user category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casualties {
    #[serde(default)]
    pub bicyclists: CasualtyCounts,
    #[serde(default)]
    pub drivers: CasualtyCounts,
    #[serde(default)]
    pub pedestrians: CasualtyCounts,
    #[serde(default)]
    pub passengers: CasualtyCounts,
}

impl Casualties {
    /// Sum across all road-user categories.
    pub fn totals(&self) -> CasualtyCounts {
        let mut totals = CasualtyCounts::default();
        for category in [
            &self.bicyclists,
            &self.drivers,
            &self.pedestrians,
            &self.passengers,
        ] {
            totals.add(category);
        }
        totals
    }
}

/// Circumstance flags recorded with an incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circumstances {
    #[serde(default)]
    pub speeding_involved: bool,
    #[serde(default)]
    pub drivers_impaired: bool,
    #[serde(default)]
    pub bicyclists_impaired: bool,
    #[serde(default)]
    pub pedestrians_impaired: bool,
}

impl Circumstances {
    pub fn any_impairment(&self) -> bool {
        self.drivers_impaired || self.bicyclists_impaired || self.pedestrians_impaired
    }
}

/// Immutable snapshot of one incident returned by an incident source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: String,
    pub coordinate: Coordinate,
    pub severity: IncidentSeverity,
    #[serde(default)]
    pub casualties: Casualties,
    #[serde(default)]
    pub circumstances: Circumstances,
    #[serde(default)]
    pub report_date: Option<DateTime<Utc>>,
}

// ========== PLANNER RESULTS ==========

/// Why a planning call produced no path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    NoPathFound,
}

/// Diagnostics attached to a failed planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDiagnostics {
    /// Provider calls issued before the search gave up.
    pub nodes_sampled: usize,
    /// Hazard at the snapped start node (+inf when unsampled).
    pub start_hazard: f64,
    /// Hazard at the snapped end node (+inf when unsampled).
    pub end_hazard: f64,
    pub grid_shape: (usize, usize),
}

/// Outcome of a grid planning call. Absence of a path is an ordinary
/// result here, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathResult {
    Found {
        /// Path node coordinates, start to end inclusive.
        path: Vec<Coordinate>,
        total_cost: f64,
        start_hazard: f64,
        end_hazard: f64,
        calls_made: usize,
    },
    NotFound {
        reason: NotFoundReason,
        diagnostics: PathDiagnostics,
    },
}

// ========== ROUTE SAFETY MODELS ==========

/// Safety sample at one route point. Lower scores mean safer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyPoint {
    /// Index into the original route polyline, not the compressed sample list.
    pub route_index: usize,
    pub coordinate: Coordinate,
    pub incident_count: usize,
    pub score: f64,
}

/// A sample point whose incident query failed and was degraded to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub route_index: usize,
    pub message: String,
}

/// Aggregated safety metrics for one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSafetyReport {
    /// Incidents deduplicated by id across all sample buffers.
    pub total_unique_incidents: usize,
    pub average_point_score: f64,
    pub max_point_score: f64,
    pub safety_points: Vec<SafetyPoint>,
    pub sampled_point_count: usize,
    /// Sample points whose incident query failed; scored as zero above.
    #[serde(default)]
    pub failures: Vec<QueryFailure>,
}

impl RouteSafetyReport {
    /// Top `n` sample points by score, most dangerous first.
    pub fn most_dangerous(&self, n: usize) -> Vec<&SafetyPoint> {
        let mut points: Vec<&SafetyPoint> = self.safety_points.iter().collect();
        points.sort_by(|a, b| b.score.total_cmp(&a.score));
        points.truncate(n);
        points
    }
}

/// An externally supplied route plus its computed safety report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub route_id: String,
    pub coordinates: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_min: f64,
    /// None when evaluation failed for this candidate.
    #[serde(default)]
    pub report: Option<RouteSafetyReport>,
}

/// What an alternative costs or saves relative to the recommended route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOff {
    pub extra_distance_km: f64,
    pub extra_duration_min: f64,
    pub score_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    pub route: CandidateRoute,
    pub trade_off: TradeOff,
}

/// Selector output: the safest route plus alternatives ordered by
/// increasing average point score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRanking {
    pub recommended: CandidateRoute,
    pub alternatives: Vec<RankedAlternative>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(38.9, -77.0).is_ok());
    }

    #[test]
    fn severity_from_casualties_prefers_worst_outcome() {
        let mut casualties = Casualties::default();
        casualties.drivers.minor = 2;
        assert_eq!(
            IncidentSeverity::from_casualties(&casualties),
            IncidentSeverity::MinorInjury
        );

        casualties.pedestrians.fatal = 1;
        assert_eq!(
            IncidentSeverity::from_casualties(&casualties),
            IncidentSeverity::Fatal
        );

        assert_eq!(
            IncidentSeverity::from_casualties(&Casualties::default()),
            IncidentSeverity::PropertyDamage
        );
    }

    #[test]
    fn not_found_reason_serializes_snake_case() {
        let result = PathResult::NotFound {
            reason: NotFoundReason::NoPathFound,
            diagnostics: PathDiagnostics {
                nodes_sampled: 0,
                start_hazard: 0.0,
                end_hazard: 0.0,
                grid_shape: (2, 2),
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "not_found");
        assert_eq!(json["reason"], "no_path_found");
    }

    #[test]
    fn most_dangerous_orders_by_score() {
        let point = |idx: usize, score: f64| SafetyPoint {
            route_index: idx,
            coordinate: Coordinate { lat: 0.0, lon: 0.0 },
            incident_count: 0,
            score,
        };
        let report = RouteSafetyReport {
            total_unique_incidents: 0,
            average_point_score: 0.0,
            max_point_score: 5.0,
            safety_points: vec![point(0, 1.0), point(1, 5.0), point(2, 3.0)],
            sampled_point_count: 3,
            failures: Vec::new(),
        };
        let top = report.most_dangerous(2);
        assert_eq!(top[0].route_index, 1);
        assert_eq!(top[1].route_index, 2);
    }
}
