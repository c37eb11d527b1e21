//! Capability interfaces to the external hazard and incident collaborators.
//!
//! The engine performs no I/O of its own; everything it knows about the
//! outside world arrives through these two traits. Implementations must be
//! safe to call concurrently — the sampling drivers fan out over them with
//! a bounded worker pool. Retry policy belongs to the implementation, not
//! here: a failed call is final for that node or sample point.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use saferoute_core::{Coordinate, IncidentRecord};

/// Error type for provider calls. The engine never inspects these beyond
/// logging; any error degrades the node/sample to its safe default.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Scalar hazard field: one danger value per coordinate.
#[async_trait]
pub trait HazardProvider: Send + Sync {
    /// Hazard at `coordinate`. Finite and non-negative on success.
    async fn hazard(&self, coordinate: Coordinate) -> Result<f64, ProviderError>;
}

/// Incident lookup: records within `radius_km` of a point, optionally
/// restricted to reports at or after `since`.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    async fn query(
        &self,
        center: Coordinate,
        radius_km: f64,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<IncidentRecord>, ProviderError>;
}
