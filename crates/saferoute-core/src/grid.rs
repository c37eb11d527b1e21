//! Hazard grid: a regular lat/lon lattice over the padded bounding box of
//! a start/end pair, holding one sampled hazard value per node.
//!
//! Unsampled and failed nodes carry `f64::INFINITY` — unknown territory
//! must read as maximally dangerous, never as safe.

use crate::error::CoreError;
use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

/// Bounding-box padding as a fraction of the span on each side.
const PAD_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardGrid {
    min_lat: f64,
    min_lon: f64,
    lat_step: f64,
    lon_step: f64,
    n_lat: usize,
    n_lon: usize,
    hazards: Vec<f64>,
    calls_made: usize,
}

impl HazardGrid {
    /// Build an unsampled grid spanning the padded bounding box of
    /// `start` and `end`, with `n_lat` x `n_lon` evenly spaced nodes.
    ///
    /// A zero span on either axis yields a degenerate single-line grid
    /// (step 0); that is legal and must not fail.
    pub fn build(
        start: Coordinate,
        end: Coordinate,
        n_lat: usize,
        n_lon: usize,
    ) -> Result<Self, CoreError> {
        if n_lat < 2 || n_lon < 2 {
            return Err(CoreError::InvalidGridSize { n_lat, n_lon });
        }

        let mut min_lat = start.lat.min(end.lat);
        let mut max_lat = start.lat.max(end.lat);
        let mut min_lon = start.lon.min(end.lon);
        let mut max_lon = start.lon.max(end.lon);

        let lat_pad = (max_lat - min_lat) * PAD_RATIO;
        let lon_pad = (max_lon - min_lon) * PAD_RATIO;
        min_lat -= lat_pad;
        max_lat += lat_pad;
        min_lon -= lon_pad;
        max_lon += lon_pad;

        let lat_step = (max_lat - min_lat) / (n_lat - 1) as f64;
        let lon_step = (max_lon - min_lon) / (n_lon - 1) as f64;

        Ok(Self {
            min_lat,
            min_lon,
            lat_step,
            lon_step,
            n_lat,
            n_lon,
            hazards: vec![f64::INFINITY; n_lat * n_lon],
            calls_made: 0,
        })
    }

    pub fn n_lat(&self) -> usize {
        self.n_lat
    }

    pub fn n_lon(&self) -> usize {
        self.n_lon
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_lat, self.n_lon)
    }

    pub fn node_count(&self) -> usize {
        self.hazards.len()
    }

    /// Provider calls issued while sampling this grid.
    pub fn calls_made(&self) -> usize {
        self.calls_made
    }

    pub fn set_calls_made(&mut self, calls: usize) {
        self.calls_made = calls;
    }

    /// Flat index of node (i, j), row-major.
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.n_lon + j
    }

    pub fn node_coordinate(&self, i: usize, j: usize) -> Coordinate {
        Coordinate {
            lat: self.min_lat + i as f64 * self.lat_step,
            lon: self.min_lon + j as f64 * self.lon_step,
        }
    }

    pub fn hazard(&self, i: usize, j: usize) -> f64 {
        self.hazards[self.index(i, j)]
    }

    pub fn set_hazard(&mut self, i: usize, j: usize, hazard: f64) {
        let idx = self.index(i, j);
        self.hazards[idx] = hazard;
    }

    /// Nearest node index for an arbitrary coordinate: round to the lattice
    /// and clamp into bounds on each axis.
    pub fn snap(&self, coordinate: Coordinate) -> (usize, usize) {
        let lat_step = if self.lat_step.abs() > 0.0 { self.lat_step } else { 1e-9 };
        let lon_step = if self.lon_step.abs() > 0.0 { self.lon_step } else { 1e-9 };

        let i = ((coordinate.lat - self.min_lat) / lat_step).round();
        let j = ((coordinate.lon - self.min_lon) / lon_step).round();

        let i = (i.max(0.0) as usize).min(self.n_lat - 1);
        let j = (j.max(0.0) as usize).min(self.n_lon - 1);
        (i, j)
    }

    /// Iterate node indices in row-major order (the sampling order).
    pub fn node_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n_lon = self.n_lon;
        (0..self.n_lat).flat_map(move |i| (0..n_lon).map(move |j| (i, j)))
    }

    /// 4-connected neighbors of (i, j): north/south/east/west, no diagonals.
    pub fn neighbors(&self, i: usize, j: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (n_lat, n_lon) = (self.n_lat, self.n_lon);
        let deltas: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        deltas.into_iter().filter_map(move |(di, dj)| {
            let ni = i as i64 + di;
            let nj = j as i64 + dj;
            if ni >= 0 && (ni as usize) < n_lat && nj >= 0 && (nj as usize) < n_lon {
                Some((ni as usize, nj as usize))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let err = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 1.0), 1, 5);
        assert!(matches!(err, Err(CoreError::InvalidGridSize { .. })));
        let err = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 1.0), 5, 0);
        assert!(matches!(err, Err(CoreError::InvalidGridSize { .. })));
    }

    #[test]
    fn bounding_box_is_padded_by_twenty_percent() {
        let grid = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 2.0), 3, 3).unwrap();
        // Span 1.0 lat padded to [-0.2, 1.2]; span 2.0 lon padded to [-0.4, 2.4].
        let first = grid.node_coordinate(0, 0);
        let last = grid.node_coordinate(2, 2);
        assert!((first.lat + 0.2).abs() < 1e-9);
        assert!((first.lon + 0.4).abs() < 1e-9);
        assert!((last.lat - 1.2).abs() < 1e-9);
        assert!((last.lon - 2.4).abs() < 1e-9);
    }

    #[test]
    fn zero_span_yields_single_line_grid() {
        let grid = HazardGrid::build(coord(5.0, 7.0), coord(5.0, 7.0), 4, 4).unwrap();
        for (i, j) in grid.node_indices() {
            let node = grid.node_coordinate(i, j);
            assert_eq!(node.lat, 5.0);
            assert_eq!(node.lon, 7.0);
        }
        // Snapping must not divide by zero.
        assert_eq!(grid.snap(coord(5.0, 7.0)), (0, 0));
    }

    #[test]
    fn nodes_start_unsampled_at_infinity() {
        let grid = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 1.0), 2, 2).unwrap();
        for (i, j) in grid.node_indices() {
            assert!(grid.hazard(i, j).is_infinite());
        }
        assert_eq!(grid.calls_made(), 0);
    }

    #[test]
    fn snap_rounds_to_nearest_node_and_clamps() {
        let grid = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 1.0), 5, 5).unwrap();
        // Grid covers [-0.2, 1.2] on each axis, step 0.35.
        assert_eq!(grid.snap(coord(-0.2, -0.2)), (0, 0));
        assert_eq!(grid.snap(coord(1.2, 1.2)), (4, 4));
        // Outside the box clamps to edges.
        assert_eq!(grid.snap(coord(-90.0, 180.0)), (0, 4));
        // Near the center rounds to the nearest lattice point.
        assert_eq!(grid.snap(coord(0.5, 0.5)), (2, 2));
    }

    #[test]
    fn neighbors_are_four_connected() {
        let grid = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 1.0), 3, 3).unwrap();
        let corner: Vec<_> = grid.neighbors(0, 0).collect();
        assert_eq!(corner.len(), 2);
        let center: Vec<_> = grid.neighbors(1, 1).collect();
        assert_eq!(center.len(), 4);
        assert!(!center.contains(&(0, 0)), "no diagonal neighbors");
    }

    #[test]
    fn row_major_iteration_order() {
        let grid = HazardGrid::build(coord(0.0, 0.0), coord(1.0, 1.0), 2, 3).unwrap();
        let order: Vec<_> = grid.node_indices().collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }
}
