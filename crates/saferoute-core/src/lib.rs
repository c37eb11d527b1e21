pub mod error;
pub mod grid;
pub mod models;
pub mod planner;
pub mod scorer;
pub mod selector;
pub mod spatial;

pub use error::CoreError;
pub use grid::HazardGrid;
pub use models::{
    CandidateRoute, Casualties, CasualtyCounts, Circumstances, Coordinate, IncidentRecord,
    IncidentSeverity, NotFoundReason, PathDiagnostics, PathResult, QueryFailure,
    RankedAlternative, RouteRanking, RouteSafetyReport, SafetyPoint, TradeOff,
};
pub use planner::{path_distance_km, plan};
pub use scorer::{incident_score, risk_to_index, score_incidents};
pub use selector::select;
pub use spatial::haversine_km;
