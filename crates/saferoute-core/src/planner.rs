//! Grid path planner: single-source shortest path over the hazard grid
//! with a combined hazard + distance edge cost.

use crate::error::CoreError;
use crate::grid::HazardGrid;
use crate::models::{Coordinate, NotFoundReason, PathDiagnostics, PathResult};
use crate::spatial::haversine_km;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Heap entry ordered by accumulated cost, then insertion sequence.
///
/// The sequence counter makes tie-breaking deterministic: among equal
/// costs the first-enqueued entry pops first, independent of any hash-map
/// iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    cost: FloatOrd,
    seq: u64,
    node: usize,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Find the minimum-cost path between the grid nodes nearest `start` and
/// `end`.
///
/// Edge cost between adjacent nodes u, v is
/// `(hazard[u] + hazard[v]) / 2 + distance_weight * haversine_km(u, v)`.
/// Edges touching an infinite-hazard node are excluded entirely, so the
/// search never routes through unsampled or unsafe territory.
///
/// Absence of a path comes back as [`PathResult::NotFound`]; only a bad
/// `distance_weight` is an error.
pub fn plan(
    grid: &HazardGrid,
    start: Coordinate,
    end: Coordinate,
    distance_weight: f64,
) -> Result<PathResult, CoreError> {
    if !distance_weight.is_finite() || distance_weight < 0.0 {
        return Err(CoreError::InvalidDistanceWeight(distance_weight));
    }

    let (start_i, start_j) = grid.snap(start);
    let (end_i, end_j) = grid.snap(end);
    let start_idx = grid.index(start_i, start_j);
    let end_idx = grid.index(end_i, end_j);
    let start_hazard = grid.hazard(start_i, start_j);
    let end_hazard = grid.hazard(end_i, end_j);

    if start_idx == end_idx {
        return Ok(PathResult::Found {
            path: vec![grid.node_coordinate(start_i, start_j)],
            total_cost: 0.0,
            start_hazard,
            end_hazard,
            calls_made: grid.calls_made(),
        });
    }

    let n = grid.node_count();
    let n_lon = grid.n_lon();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut heap: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    let mut seq = 0u64;

    dist[start_idx] = 0.0;
    heap.push(Reverse(OpenNode {
        cost: FloatOrd(0.0),
        seq,
        node: start_idx,
    }));

    while let Some(Reverse(current)) = heap.pop() {
        let u = current.node;
        if current.cost.0 > dist[u] {
            continue;
        }
        if u == end_idx {
            break;
        }

        let (ui, uj) = (u / n_lon, u % n_lon);
        let hazard_u = grid.hazard(ui, uj);
        if hazard_u.is_infinite() {
            continue;
        }
        let coord_u = grid.node_coordinate(ui, uj);

        for (vi, vj) in grid.neighbors(ui, uj) {
            let hazard_v = grid.hazard(vi, vj);
            if hazard_v.is_infinite() {
                continue;
            }
            let v = grid.index(vi, vj);
            let coord_v = grid.node_coordinate(vi, vj);
            let d_km = haversine_km(coord_u.lat, coord_u.lon, coord_v.lat, coord_v.lon);
            let edge_cost = (hazard_u + hazard_v) / 2.0 + distance_weight * d_km;
            let new_cost = current.cost.0 + edge_cost;
            if new_cost < dist[v] {
                dist[v] = new_cost;
                prev[v] = Some(u);
                seq += 1;
                heap.push(Reverse(OpenNode {
                    cost: FloatOrd(new_cost),
                    seq,
                    node: v,
                }));
            }
        }
    }

    if dist[end_idx].is_infinite() {
        return Ok(PathResult::NotFound {
            reason: NotFoundReason::NoPathFound,
            diagnostics: PathDiagnostics {
                nodes_sampled: grid.calls_made(),
                start_hazard,
                end_hazard,
                grid_shape: grid.shape(),
            },
        });
    }

    let mut indices = Vec::new();
    let mut cursor = Some(end_idx);
    while let Some(idx) = cursor {
        indices.push(idx);
        cursor = prev[idx];
    }
    indices.reverse();

    let path = indices
        .into_iter()
        .map(|idx| grid.node_coordinate(idx / n_lon, idx % n_lon))
        .collect();

    Ok(PathResult::Found {
        path,
        total_cost: dist[end_idx],
        start_hazard,
        end_hazard,
        calls_made: grid.calls_made(),
    })
}

/// Total haversine length of a path in kilometers.
pub fn path_distance_km(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_km(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon))
        .sum()
}
