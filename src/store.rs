//! Registry of parking lots and the spots they own.

use crate::error::{ParkadeError, Result};
use crate::types::{LotId, ParkingLot, ParkingSpot, SpotId};
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

/// Per-lot membership: spot ids in creation order plus the set of spot
/// numbers already taken in the lot.
#[derive(Debug, Default)]
struct LotRoster {
    spots: Vec<SpotId>,
    numbers: FxHashSet<String>,
}

/// Concurrent registry of lots and spots.
///
/// A lot's roster is the gate for spot creation: once `seal_lot` removes it,
/// no new spot can join the lot. Listing orders follow creation order.
#[derive(Debug, Default)]
pub struct SpotStore {
    lots: DashMap<LotId, ParkingLot>,
    lot_order: RwLock<Vec<LotId>>,
    spots: DashMap<SpotId, ParkingSpot>,
    rosters: DashMap<LotId, LotRoster>,
}

impl SpotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created lot.
    pub fn insert_lot(&self, lot: ParkingLot) {
        let id = lot.id;
        self.rosters.insert(id, LotRoster::default());
        self.lots.insert(id, lot);
        self.lot_order.write().push(id);
    }

    pub fn get_lot(&self, lot: LotId) -> Option<ParkingLot> {
        self.lots.get(&lot).map(|entry| entry.value().clone())
    }

    /// All lots in creation order.
    pub fn list_lots(&self) -> Vec<ParkingLot> {
        let order = self.lot_order.read().clone();
        order
            .into_iter()
            .filter_map(|id| self.lots.get(&id).map(|entry| entry.value().clone()))
            .collect()
    }

    /// Attach a spot to its lot.
    ///
    /// Fails with [`ParkadeError::LotNotFound`] when the lot does not exist
    /// (or has been sealed for deletion) and with
    /// [`ParkadeError::DuplicateSpotNumber`] when the spot number is already
    /// taken within the lot.
    pub fn create_spot(&self, spot: ParkingSpot) -> Result<()> {
        let Some(mut roster) = self.rosters.get_mut(&spot.lot_id) else {
            return Err(ParkadeError::LotNotFound(spot.lot_id));
        };
        if !roster.numbers.insert(spot.number.clone()) {
            return Err(ParkadeError::DuplicateSpotNumber {
                lot: spot.lot_id,
                number: spot.number,
            });
        }
        roster.spots.push(spot.id);
        // Publish the record before releasing the roster guard so a
        // concurrent seal_lot observes either no membership or a resolvable
        // spot id, never a dangling one.
        self.spots.insert(spot.id, spot);
        Ok(())
    }

    pub fn get_spot(&self, spot: SpotId) -> Option<ParkingSpot> {
        self.spots.get(&spot).map(|entry| entry.value().clone())
    }

    /// All spots of a lot in creation order.
    pub fn list_spots(&self, lot: LotId) -> Result<Vec<ParkingSpot>> {
        let Some(roster) = self.rosters.get(&lot) else {
            return Err(ParkadeError::LotNotFound(lot));
        };
        Ok(roster
            .spots
            .iter()
            .filter_map(|id| self.spots.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    /// First phase of lot deletion: atomically withdraw the lot and its
    /// roster so no further spot can be created under it. Returns the ids of
    /// the owned spots; their records stay resolvable until `purge_spots`.
    pub fn seal_lot(&self, lot: LotId) -> Result<Vec<SpotId>> {
        let Some((_, roster)) = self.rosters.remove(&lot) else {
            return Err(ParkadeError::LotNotFound(lot));
        };
        self.lots.remove(&lot);
        self.lot_order.write().retain(|id| *id != lot);
        Ok(roster.spots)
    }

    /// Final phase of lot deletion: drop the spot records themselves.
    pub fn purge_spots(&self, spots: &[SpotId]) {
        for spot in spots {
            self.spots.remove(spot);
        }
    }

    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    pub fn spot_count(&self) -> usize {
        self.spots.len()
    }
}
