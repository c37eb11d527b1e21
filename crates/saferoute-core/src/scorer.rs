//! Risk scoring: collapse a set of incident records into one scalar
//! danger score. Higher means more dangerous; "safety score" is inverted
//! naming retained from the domain.

use crate::models::{IncidentRecord, IncidentSeverity};

const CASUALTY_WEIGHT: f64 = 0.5;
const SPEEDING_MULTIPLIER: f64 = 1.3;
const IMPAIRMENT_MULTIPLIER: f64 = 1.4;

/// Score a set of incidents. Empty input scores 0.0.
///
/// Pure and order-independent: the result is a plain sum of per-incident
/// contributions, so reordering the input only moves floating-point
/// rounding, never the aggregate.
pub fn score_incidents(incidents: &[IncidentRecord]) -> f64 {
    incidents.iter().map(incident_score).sum()
}

/// Contribution of a single incident.
///
/// Base unit 1.0 scaled by severity, plus a weighted casualty term, then
/// circumstance multipliers (speeding first, impairment second; both can
/// apply to the same incident).
pub fn incident_score(incident: &IncidentRecord) -> f64 {
    let severity_factor = match incident.severity {
        IncidentSeverity::Fatal | IncidentSeverity::MajorInjury => 3.0,
        IncidentSeverity::MinorInjury => 1.5,
        IncidentSeverity::PropertyDamage => 1.0,
    };
    let mut subtotal = severity_factor;

    let totals = incident.casualties.totals();
    let casualty_points = totals.fatal * 5 + totals.major * 2 + totals.minor;
    subtotal += f64::from(casualty_points) * CASUALTY_WEIGHT;

    if incident.circumstances.speeding_involved {
        subtotal *= SPEEDING_MULTIPLIER;
    }
    if incident.circumstances.any_impairment() {
        subtotal *= IMPAIRMENT_MULTIPLIER;
    }
    subtotal
}

/// Map a raw risk score into a 1..=num_bins severity bucket (higher bucket
/// means riskier). Scores at or above `max_risk` land in the top bucket.
pub fn risk_to_index(risk_score: f64, max_risk: f64, num_bins: usize) -> usize {
    let bins = num_bins.max(1);
    if risk_score.is_nan() || risk_score <= 0.0 {
        return 1;
    }
    if risk_score >= max_risk {
        return bins;
    }
    let bin_width = max_risk / bins as f64;
    (risk_score / bin_width) as usize + 1
}
