//! Error taxonomy for the safe-route core.
//!
//! Only structural failures surface here. Per-node and per-sample provider
//! failures are absorbed locally with a safe default and a diagnostic note;
//! "no path" is a [`crate::models::PathResult`] variant, never an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Grid dimensions below the 2x2 minimum. Fatal to the call, raised
    /// before any sampling happens.
    #[error("invalid grid size {n_lat}x{n_lon}: both dimensions must be >= 2")]
    InvalidGridSize { n_lat: usize, n_lon: usize },

    /// Coordinate outside the WGS84 domain.
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Distance weight must be a finite value >= 0.
    #[error("invalid distance weight {0}")]
    InvalidDistanceWeight(f64),

    /// Every candidate route failed evaluation; there is nothing to recommend.
    #[error("no candidate route has a computed safety report")]
    NoRouteAvailable,
}
