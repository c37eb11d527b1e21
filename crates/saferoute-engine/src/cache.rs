//! Caller-owned hazard cache.
//!
//! Sharing sampled hazard values across planning calls is an optimization,
//! never a correctness requirement. The cache is an explicit object the
//! caller constructs, passes in, and tears down — there is no global or
//! import-time state. Concurrent readers are safe: entries live in a
//! sharded [`DashMap`] keyed by a quantized coordinate bucket.

use dashmap::DashMap;
use saferoute_core::Coordinate;
use std::time::{Duration, Instant};

/// Bucket resolution in degrees. ~11m of latitude, fine enough that two
/// coordinates in one bucket see the same hazard field value.
const BUCKET_DEG: f64 = 1e-4;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    fetched_at: Instant,
    hazard: f64,
}

/// Concurrent map from coordinate bucket to last sampled hazard value.
#[derive(Debug)]
pub struct HazardCache {
    entries: DashMap<(i64, i64), CacheEntry>,
    max_age: Duration,
    max_entries: usize,
}

impl HazardCache {
    pub fn new(max_age: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_age,
            max_entries: max_entries.max(1),
        }
    }

    fn bucket(coordinate: Coordinate) -> (i64, i64) {
        (
            (coordinate.lat / BUCKET_DEG).round() as i64,
            (coordinate.lon / BUCKET_DEG).round() as i64,
        )
    }

    /// Cached hazard for the coordinate's bucket, if present and fresh.
    pub fn get(&self, coordinate: Coordinate) -> Option<f64> {
        let entry = self.entries.get(&Self::bucket(coordinate))?;
        if entry.fetched_at.elapsed() > self.max_age {
            return None;
        }
        Some(entry.hazard)
    }

    /// Record a successfully sampled hazard value. Failures and the +inf
    /// sentinel are never cached — a later call should retry the provider.
    pub fn insert(&self, coordinate: Coordinate, hazard: f64) {
        if !hazard.is_finite() {
            return;
        }
        self.entries.insert(
            Self::bucket(coordinate),
            CacheEntry {
                fetched_at: Instant::now(),
                hazard,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries, then oldest-first down to the size bound.
    pub fn prune(&self) {
        let now = Instant::now();
        let mut entries: Vec<((i64, i64), Instant)> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().fetched_at))
            .collect();

        for (key, fetched_at) in &entries {
            if now.duration_since(*fetched_at) > self.max_age {
                self.entries.remove(key);
            }
        }

        if self.entries.len() <= self.max_entries {
            return;
        }

        entries.sort_by_key(|(_, fetched_at)| *fetched_at);
        for (key, _) in entries {
            if self.entries.len() <= self.max_entries {
                break;
            }
            self.entries.remove(&key);
        }
    }
}
