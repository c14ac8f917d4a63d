//! Geographic index over spot positions.
//!
//! A deliberately simple structure: positions live in a flat map and radius
//! queries do a full haversine scan per candidate. At lot-registry scale
//! (thousands of spots) the scan stays cheap, and it can never admit a
//! candidate beyond the requested radius.

use crate::spatial::distance_m;
use crate::types::SpotId;
use geo::Point;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Positions of all registered spots, queryable by radius.
///
/// The index itself is not synchronized; the engine wraps it in a
/// `parking_lot::RwLock` and takes the read side for queries.
#[derive(Debug, Default)]
pub struct GeoIndex {
    positions: FxHashMap<SpotId, Point>,
}

impl GeoIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            positions: FxHashMap::default(),
        }
    }

    /// Insert or replace a spot's position.
    pub fn upsert(&mut self, spot: SpotId, position: Point) {
        self.positions.insert(spot, position);
    }

    /// Remove a spot's position. Returns whether it was present.
    pub fn remove(&mut self, spot: SpotId) -> bool {
        self.positions.remove(&spot).is_some()
    }

    /// Current position of a spot, if indexed.
    pub fn position(&self, spot: SpotId) -> Option<Point> {
        self.positions.get(&spot).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All spots within `radius_meters` of `center`, each paired with its
    /// distance in meters, sorted by ascending distance with ties broken by
    /// spot id.
    ///
    /// A non-finite center cannot be meaningfully compared against; such
    /// queries are rejected with a warning and an empty result.
    pub fn query_within_radius(&self, center: &Point, radius_meters: f64) -> Vec<(SpotId, f64)> {
        if !center.x().is_finite() || !center.y().is_finite() {
            log::warn!(
                "Rejecting radius query with non-finite center: ({}, {})",
                center.x(),
                center.y()
            );
            return Vec::new();
        }

        let mut results = Vec::new();
        for (spot, position) in &self.positions {
            let distance = distance_m(center, position);
            if distance <= radius_meters {
                results.push((*spot, distance));
            }
        }

        results.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        results
    }
}
