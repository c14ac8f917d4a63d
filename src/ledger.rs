//! Reservation ledger with per-spot exclusion.
//!
//! Every spot owns a `SpotBook` behind its own `RwLock`. The conflict scan
//! and the insert that follows happen under that spot's write guard, so
//! overlap races are settled per spot and traffic on one spot never blocks
//! reservations on another.

use crate::error::{ParkadeError, Result};
use crate::types::{Reservation, ReservationId, ReservationStatus, SpotId};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::SystemTime;

/// Record count at which a book is considered suspiciously large.
const BOOK_WARN_THRESHOLD: usize = 10_000;

/// All reservation records of one spot.
#[derive(Debug, Default)]
struct SpotBook {
    reservations: Vec<Reservation>,
    /// Set under the write guard during lot deletion. A retired book turns
    /// every subsequent operation into a not-found, as if the spot had
    /// already vanished.
    retired: bool,
}

/// Reservation records for all spots, guarded per spot.
///
/// Lock discipline: a book's write guard may touch the `owners` map, never
/// the other way around, and only the lot-deletion cascade holds more than
/// one book guard at a time (acquired in ascending spot-id order).
#[derive(Debug, Default)]
pub struct ReservationLedger {
    books: DashMap<SpotId, Arc<RwLock<SpotBook>>>,
    /// Reservation id -> owning spot, for id-first lookups.
    owners: DashMap<ReservationId, SpotId>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty book for a newly created spot.
    pub fn register_spot(&self, spot: SpotId) {
        self.books
            .insert(spot, Arc::new(RwLock::new(SpotBook::default())));
    }

    /// Clone the book handle out of the map so no shard guard is held while
    /// the book lock is taken.
    fn book(&self, spot: SpotId) -> Option<Arc<RwLock<SpotBook>>> {
        self.books.get(&spot).map(|entry| Arc::clone(entry.value()))
    }

    /// Claim `[start, end)` on a spot.
    ///
    /// The overlap check only considers active records; ended and cancelled
    /// reservations free their interval immediately.
    pub fn reserve(
        &self,
        spot: SpotId,
        start: SystemTime,
        end: SystemTime,
        plate: &str,
    ) -> Result<Reservation> {
        let Some(book) = self.book(spot) else {
            return Err(ParkadeError::SpotNotFound(spot));
        };
        if start >= end {
            return Err(ParkadeError::InvalidInterval);
        }

        let mut guard = book.write();
        if guard.retired {
            return Err(ParkadeError::SpotNotFound(spot));
        }
        if let Some(existing) = guard
            .reservations
            .iter()
            .find(|r| r.is_active() && r.overlaps(start, end))
        {
            return Err(ParkadeError::Conflict {
                spot,
                existing: existing.id,
            });
        }

        let reservation = Reservation {
            id: ReservationId::new(),
            spot_id: spot,
            start,
            end,
            plate: plate.to_string(),
            status: ReservationStatus::Active,
        };
        guard.reservations.push(reservation.clone());
        self.owners.insert(reservation.id, spot);
        if guard.reservations.len() == BOOK_WARN_THRESHOLD {
            log::warn!(
                "Spot {} carries {} reservation records",
                spot,
                guard.reservations.len()
            );
        }
        Ok(reservation)
    }

    /// Mark a reservation ended.
    pub fn end(&self, reservation: ReservationId) -> Result<Reservation> {
        self.transition(reservation, ReservationStatus::Ended)
    }

    /// Mark a reservation cancelled.
    pub fn cancel(&self, reservation: ReservationId) -> Result<Reservation> {
        self.transition(reservation, ReservationStatus::Cancelled)
    }

    fn transition(&self, reservation: ReservationId, to: ReservationStatus) -> Result<Reservation> {
        let Some(spot) = self.owners.get(&reservation).map(|entry| *entry.value()) else {
            return Err(ParkadeError::ReservationNotFound(reservation));
        };
        let Some(book) = self.book(spot) else {
            return Err(ParkadeError::ReservationNotFound(reservation));
        };

        let mut guard = book.write();
        if guard.retired {
            return Err(ParkadeError::ReservationNotFound(reservation));
        }
        let Some(record) = guard.reservations.iter_mut().find(|r| r.id == reservation) else {
            return Err(ParkadeError::ReservationNotFound(reservation));
        };
        if record.status.is_terminal() {
            return Err(ParkadeError::InvalidState {
                reservation,
                status: record.status,
            });
        }
        record.status = to;
        Ok(record.clone())
    }

    /// Look up a reservation by id, whatever its status.
    pub fn get(&self, reservation: ReservationId) -> Option<Reservation> {
        let spot = self.owners.get(&reservation).map(|entry| *entry.value())?;
        let book = self.book(spot)?;
        let guard = book.read();
        guard
            .reservations
            .iter()
            .find(|r| r.id == reservation)
            .cloned()
    }

    /// All active reservations of a spot, in creation order.
    pub fn active_for_spot(&self, spot: SpotId) -> Result<Vec<Reservation>> {
        let Some(book) = self.book(spot) else {
            return Err(ParkadeError::SpotNotFound(spot));
        };
        let guard = book.read();
        if guard.retired {
            return Err(ParkadeError::SpotNotFound(spot));
        }
        Ok(guard
            .reservations
            .iter()
            .filter(|r| r.is_active())
            .cloned()
            .collect())
    }

    /// Active reservations of a spot covering `at`. Non-overlap keeps this
    /// to at most one entry.
    pub fn active_covering(&self, spot: SpotId, at: SystemTime) -> Result<Vec<Reservation>> {
        let Some(book) = self.book(spot) else {
            return Err(ParkadeError::SpotNotFound(spot));
        };
        let guard = book.read();
        if guard.retired {
            return Err(ParkadeError::SpotNotFound(spot));
        }
        Ok(guard
            .reservations
            .iter()
            .filter(|r| r.is_active() && r.covers(at))
            .cloned()
            .collect())
    }

    /// Whether no active reservation covers `at`. Availability is derived
    /// here on every call; there is no stored flag to go stale.
    pub fn is_available_at(&self, spot: SpotId, at: SystemTime) -> Result<bool> {
        let Some(book) = self.book(spot) else {
            return Err(ParkadeError::SpotNotFound(spot));
        };
        let guard = book.read();
        if guard.retired {
            return Err(ParkadeError::SpotNotFound(spot));
        }
        Ok(!guard
            .reservations
            .iter()
            .any(|r| r.is_active() && r.covers(at)))
    }

    /// End the active reservation covering `now`, if any.
    ///
    /// At most one can cover any instant, so the first match is the only
    /// match.
    pub fn release_covering(&self, spot: SpotId, now: SystemTime) -> Result<Option<Reservation>> {
        let Some(book) = self.book(spot) else {
            return Err(ParkadeError::SpotNotFound(spot));
        };
        let mut guard = book.write();
        if guard.retired {
            return Err(ParkadeError::SpotNotFound(spot));
        }
        let Some(record) = guard
            .reservations
            .iter_mut()
            .find(|r| r.is_active() && r.covers(now))
        else {
            return Ok(None);
        };
        record.status = ReservationStatus::Ended;
        Ok(Some(record.clone()))
    }

    /// Retire the books of spots being deleted and erase their records.
    ///
    /// Guards are acquired in ascending spot-id order and held together, so
    /// a reservation racing the cascade either lands before the sweep and is
    /// erased with the rest, or observes a retired book and fails with
    /// not-found. Returns the number of records erased.
    pub fn retire_spots(&self, spots: &[SpotId]) -> usize {
        let mut handles: Vec<(SpotId, Arc<RwLock<SpotBook>>)> = spots
            .iter()
            .filter_map(|spot| self.book(*spot).map(|book| (*spot, book)))
            .collect();
        handles.sort_by_key(|(spot, _)| *spot);

        let mut guards: Vec<_> = handles.iter().map(|(_, book)| book.write()).collect();
        let mut erased = 0;
        for guard in &mut guards {
            guard.retired = true;
            for reservation in guard.reservations.drain(..) {
                self.owners.remove(&reservation.id);
                erased += 1;
            }
        }
        drop(guards);

        for (spot, _) in &handles {
            self.books.remove(spot);
        }
        erased
    }

    /// Total records on file, whatever their status.
    pub fn reservation_count(&self) -> usize {
        self.owners.len()
    }
}
