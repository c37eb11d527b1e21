//! Async orchestration for hazard-aware planning: provider traits, the
//! shared hazard cache, bounded-concurrency grid sampling, route safety
//! evaluation, and route ranking.

pub mod cache;
pub mod config;
pub mod evaluator;
pub mod planner;
pub mod providers;
pub mod sampler;

pub use cache::HazardCache;
pub use config::EngineConfig;
pub use evaluator::{evaluate_candidates, evaluate_route, recommend_route};
pub use planner::{plan_safe_path, PlanOutcome};
pub use providers::{HazardProvider, IncidentSource, ProviderError};
pub use sampler::{sample_grid, SampleFailure, SampleOutcome};

pub use saferoute_core::{
    CandidateRoute, CoreError, Coordinate, HazardGrid, PathResult, RouteRanking, RouteSafetyReport,
};
