//! Core engine implementation for parkade.
//!
//! This module defines the main `Engine` type, wiring the lot/spot registry,
//! the reservation ledger, and the geographic index behind one cloneable
//! handle.

use crate::error::{ParkadeError, Result};
use crate::index::GeoIndex;
use crate::ledger::ReservationLedger;
use crate::spatial::validate_point;
use crate::store::SpotStore;
use crate::types::{
    Config, EngineStats, LotId, NearbySpot, ParkingLot, ParkingSpot, Reservation, ReservationId,
    SpotCategory, SpotId,
};
use geo::Point;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Main parkade engine providing reservation and availability tracking.
///
/// The `Engine` is the core of parkade, offering:
/// - Lot and spot registration with cascading deletion
/// - Conflict-checked reservations with one-way lifecycle transitions
/// - Availability derived from the ledger at any instant, past or future
/// - Radius searches for available spots, nearest first
///
/// Cloning the handle is cheap and every clone operates on the same engine.
/// There is no global engine; callers hold and pass the handle explicitly.
///
/// # Examples
///
/// ## Basic usage
/// ```rust
/// use parkade::{Engine, Point, SpotCategory};
/// use std::time::{Duration, SystemTime};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::new();
///
/// let lot = engine.create_lot("Connaught Place", Point::new(77.2090, 28.6139))?;
/// let spot = engine.create_spot(lot.id, "A-12", SpotCategory::Car)?;
///
/// let start = SystemTime::now();
/// let end = start + Duration::from_secs(2 * 3600);
/// let reservation = engine.reserve(spot.id, start, end, "DL8CAF1234")?;
///
/// assert!(!engine.is_spot_available(spot.id)?);
/// engine.end_reservation(reservation.id)?;
/// assert!(engine.is_spot_available(spot.id)?);
/// # Ok(())
/// # }
/// ```
///
/// ## Searching nearby
/// ```rust
/// use parkade::{Engine, Point, SpotCategory};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::new();
/// let lot = engine.create_lot("Connaught Place", Point::new(77.2090, 28.6139))?;
/// engine.create_spot(lot.id, "A-1", SpotCategory::Car)?;
///
/// // Searching from India Gate, roughly two kilometers away.
/// let nearby = engine.search_available(&Point::new(77.2295, 28.6129), 2_500.0, None)?;
/// assert_eq!(nearby.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Engine {
    pub(crate) inner: Arc<EngineInner>,
}

pub(crate) struct EngineInner {
    /// Engine configuration
    config: Config,
    /// Lot and spot registry
    store: SpotStore,
    /// Per-spot reservation books
    ledger: ReservationLedger,
    /// Spot positions for radius searches
    geo: RwLock<GeoIndex>,
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config: Config::default(),
                store: SpotStore::new(),
                ledger: ReservationLedger::new(),
                geo: RwLock::new(GeoIndex::new()),
            }),
        }
    }

    /// Create an engine with custom configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parkade::{Config, Engine};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::default()
    ///     .with_max_search_radius_m(5_000.0)
    ///     .with_default_search_limit(10);
    /// let engine = Engine::with_config(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(ParkadeError::InvalidInput)?;
        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                store: SpotStore::new(),
                ledger: ReservationLedger::new(),
                geo: RwLock::new(GeoIndex::new()),
            }),
        })
    }

    /// Create an engine builder.
    pub fn builder() -> crate::builder::EngineBuilder {
        crate::builder::EngineBuilder::new()
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Register a new parking lot at a geographic position.
    ///
    /// The position is `Point::new(longitude, latitude)`; both coordinates
    /// must be finite and within range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parkade::{Engine, Point};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = Engine::new();
    /// let lot = engine.create_lot("Connaught Place", Point::new(77.2090, 28.6139))?;
    /// assert_eq!(engine.get_lot(lot.id)?.name, "Connaught Place");
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_lot(&self, name: &str, position: Point) -> Result<ParkingLot> {
        if name.trim().is_empty() {
            return Err(ParkadeError::InvalidInput(
                "Lot name must not be empty".to_string(),
            ));
        }
        validate_point(&position)?;

        let lot = ParkingLot {
            id: LotId::new(),
            name: name.to_string(),
            position,
        };
        self.inner.store.insert_lot(lot.clone());
        log::debug!("Created lot {} ({})", lot.id, lot.name);
        Ok(lot)
    }

    /// Look up a lot by id.
    pub fn get_lot(&self, lot: LotId) -> Result<ParkingLot> {
        self.inner
            .store
            .get_lot(lot)
            .ok_or(ParkadeError::LotNotFound(lot))
    }

    /// All lots in creation order.
    pub fn list_lots(&self) -> Vec<ParkingLot> {
        self.inner.store.list_lots()
    }

    /// Delete a lot together with its spots and their reservations.
    ///
    /// The cascade seals the lot first, so no new spot can join it, then
    /// retires every owned spot's book under exclusion before any record is
    /// dropped. Afterwards the lot, its spots, and their reservations all
    /// answer with not-found; reservations racing the deletion either land
    /// before it (and are erased with the rest) or fail cleanly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parkade::{Engine, Point, SpotCategory};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = Engine::new();
    /// let lot = engine.create_lot("Central", Point::new(77.2090, 28.6139))?;
    /// let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car)?;
    ///
    /// engine.delete_lot(lot.id)?;
    /// assert!(engine.get_lot(lot.id).is_err());
    /// assert!(engine.get_spot(spot.id).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn delete_lot(&self, lot: LotId) -> Result<()> {
        let spots = self.inner.store.seal_lot(lot)?;
        let erased = self.inner.ledger.retire_spots(&spots);

        {
            let mut geo = self.inner.geo.write();
            for spot in &spots {
                geo.remove(*spot);
            }
        }
        self.inner.store.purge_spots(&spots);

        log::debug!(
            "Deleted lot {}: {} spots and {} reservations erased",
            lot,
            spots.len(),
            erased
        );
        Ok(())
    }

    /// Create a spot inside a lot.
    ///
    /// The spot inherits the lot's coordinate for search purposes, and its
    /// number must be unique within the lot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parkade::{Engine, Point, SpotCategory};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = Engine::new();
    /// let lot = engine.create_lot("Central", Point::new(77.2090, 28.6139))?;
    ///
    /// let spot = engine.create_spot(lot.id, "B-07", SpotCategory::Ev)?;
    /// assert_eq!(spot.lot_id, lot.id);
    /// assert_eq!(engine.list_spots(lot.id)?.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_spot(
        &self,
        lot: LotId,
        number: &str,
        category: SpotCategory,
    ) -> Result<ParkingSpot> {
        if number.trim().is_empty() {
            return Err(ParkadeError::InvalidInput(
                "Spot number must not be empty".to_string(),
            ));
        }
        let parent = self.get_lot(lot)?;

        let spot = ParkingSpot {
            id: SpotId::new(),
            lot_id: lot,
            number: number.to_string(),
            category,
        };

        // NOTE: the book and the geo entry must exist before the spot id is
        // discoverable through the store, so a deletion cascade that wins the
        // race always finds both and can retire them.
        self.inner.ledger.register_spot(spot.id);
        self.inner.geo.write().upsert(spot.id, parent.position);
        if let Err(err) = self.inner.store.create_spot(spot.clone()) {
            self.inner.ledger.retire_spots(&[spot.id]);
            self.inner.geo.write().remove(spot.id);
            return Err(err);
        }

        log::debug!("Created spot {} ({} in lot {})", spot.id, spot.number, lot);
        Ok(spot)
    }

    /// Look up a spot by id.
    pub fn get_spot(&self, spot: SpotId) -> Result<ParkingSpot> {
        self.inner
            .store
            .get_spot(spot)
            .ok_or(ParkadeError::SpotNotFound(spot))
    }

    /// All spots of a lot in creation order.
    pub fn list_spots(&self, lot: LotId) -> Result<Vec<ParkingSpot>> {
        self.inner.store.list_spots(lot)
    }

    /// Reserve a spot for the half-open interval `[start, end)`.
    ///
    /// The claim is checked against every active reservation of the spot
    /// under that spot's own exclusion; reservations on other spots proceed
    /// in parallel. Overlap with an active record fails with
    /// [`ParkadeError::Conflict`] naming the blocking reservation. Ended and
    /// cancelled records free their interval immediately, and back-to-back
    /// intervals (one ending exactly when the next starts) do not conflict.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parkade::{Engine, ParkadeError, Point, SpotCategory};
    /// use std::time::{Duration, SystemTime};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = Engine::new();
    /// let lot = engine.create_lot("Central", Point::new(77.2090, 28.6139))?;
    /// let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car)?;
    ///
    /// let noon = SystemTime::now();
    /// let first = engine.reserve(spot.id, noon, noon + Duration::from_secs(7200), "DL8CAF1234")?;
    ///
    /// // An overlapping claim is rejected, naming the blocker.
    /// let err = engine
    ///     .reserve(spot.id, noon + Duration::from_secs(3600), noon + Duration::from_secs(5400), "X")
    ///     .unwrap_err();
    /// assert_eq!(err, ParkadeError::Conflict { spot: spot.id, existing: first.id });
    /// # Ok(())
    /// # }
    /// ```
    pub fn reserve(
        &self,
        spot: SpotId,
        start: SystemTime,
        end: SystemTime,
        plate: &str,
    ) -> Result<Reservation> {
        let reservation = self.inner.ledger.reserve(spot, start, end, plate)?;
        log::debug!("Reserved spot {} as {}", spot, reservation.id);
        Ok(reservation)
    }

    /// Reserve a spot from now for the given duration.
    ///
    /// Convenience over [`Engine::reserve`] with the interval
    /// `[now, now + duration)`.
    pub fn reserve_now(
        &self,
        spot: SpotId,
        duration: Duration,
        plate: &str,
    ) -> Result<Reservation> {
        let start = SystemTime::now();
        self.reserve(spot, start, start + duration, plate)
    }

    /// End an active reservation.
    ///
    /// Ending frees the spot from the transition onward; the record itself
    /// survives. Ending an already-terminal reservation fails with
    /// [`ParkadeError::InvalidState`].
    pub fn end_reservation(&self, reservation: ReservationId) -> Result<Reservation> {
        self.inner.ledger.end(reservation)
    }

    /// Cancel an active reservation.
    ///
    /// Same rules as [`Engine::end_reservation`]; the record moves to
    /// `Cancelled` instead.
    pub fn cancel_reservation(&self, reservation: ReservationId) -> Result<Reservation> {
        self.inner.ledger.cancel(reservation)
    }

    /// Look up a reservation by id, whatever its status.
    pub fn get_reservation(&self, reservation: ReservationId) -> Result<Reservation> {
        self.inner
            .ledger
            .get(reservation)
            .ok_or(ParkadeError::ReservationNotFound(reservation))
    }

    /// All active reservations of a spot, in creation order.
    pub fn active_reservations(&self, spot: SpotId) -> Result<Vec<Reservation>> {
        self.inner.ledger.active_for_spot(spot)
    }

    /// The active reservations of a spot covering `at`.
    ///
    /// Non-overlap keeps this to at most one entry; an empty result means
    /// the spot is free at that instant.
    pub fn active_reservations_at(
        &self,
        spot: SpotId,
        at: SystemTime,
    ) -> Result<Vec<Reservation>> {
        self.inner.ledger.active_covering(spot, at)
    }

    /// Whether the spot is free right now.
    pub fn is_spot_available(&self, spot: SpotId) -> Result<bool> {
        self.is_spot_available_at(spot, SystemTime::now())
    }

    /// Whether the spot is free at a given instant, past or future.
    ///
    /// Availability is derived from the ledger on every call; a spot is free
    /// at `at` exactly when no active reservation covers it.
    pub fn is_spot_available_at(&self, spot: SpotId, at: SystemTime) -> Result<bool> {
        self.inner.ledger.is_available_at(spot, at)
    }

    /// End the active reservation currently occupying a spot, if any.
    ///
    /// Convenience for gate hardware reporting a departure: there is at most
    /// one covering reservation to end. Returns it, or `None` when the spot
    /// was not occupied.
    pub fn release_spot(&self, spot: SpotId) -> Result<Option<Reservation>> {
        self.release_spot_at(spot, SystemTime::now())
    }

    /// End the active reservation covering `at` on a spot, if any.
    pub fn release_spot_at(&self, spot: SpotId, at: SystemTime) -> Result<Option<Reservation>> {
        self.inner.ledger.release_covering(spot, at)
    }

    /// Find available spots near a point, closest first.
    pub fn search_available(
        &self,
        center: &Point,
        radius_m: f64,
        limit: Option<usize>,
    ) -> Result<Vec<NearbySpot>> {
        self.search_available_at(center, radius_m, limit, SystemTime::now())
    }

    /// Find spots within `radius_m` of `center` that are available at `at`,
    /// sorted by ascending distance with ties broken by spot id.
    ///
    /// `limit` caps the result; `None` applies the configured default. The
    /// radius and limit are checked against the configured maxima up front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use parkade::{Engine, Point, SpotCategory};
    /// use std::time::{Duration, SystemTime};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = Engine::new();
    /// let lot = engine.create_lot("Central", Point::new(77.2090, 28.6139))?;
    /// let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car)?;
    ///
    /// let noon = SystemTime::now() + Duration::from_secs(3600);
    /// engine.reserve(spot.id, noon, noon + Duration::from_secs(7200), "DL8CAF1234")?;
    ///
    /// let here = Point::new(77.2090, 28.6139);
    /// // Occupied at noon, free again once the reservation lapses.
    /// assert!(engine.search_available_at(&here, 500.0, None, noon)?.is_empty());
    /// let later = noon + Duration::from_secs(7200);
    /// assert_eq!(engine.search_available_at(&here, 500.0, None, later)?.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn search_available_at(
        &self,
        center: &Point,
        radius_m: f64,
        limit: Option<usize>,
        at: SystemTime,
    ) -> Result<Vec<NearbySpot>> {
        validate_point(center)?;
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ParkadeError::InvalidInput(format!(
                "Search radius must be finite and positive, got: {}",
                radius_m
            )));
        }
        if radius_m > self.inner.config.max_search_radius_m {
            return Err(ParkadeError::InvalidInput(format!(
                "Search radius {} exceeds configured maximum {}",
                radius_m, self.inner.config.max_search_radius_m
            )));
        }
        let limit = match limit {
            None => self.inner.config.default_search_limit,
            Some(0) => {
                return Err(ParkadeError::InvalidInput(
                    "Search limit must be greater than zero".to_string(),
                ));
            }
            Some(requested) if requested > self.inner.config.max_search_limit => {
                return Err(ParkadeError::InvalidInput(format!(
                    "Search limit {} exceeds configured maximum {}",
                    requested, self.inner.config.max_search_limit
                )));
            }
            Some(requested) => requested,
        };

        let candidates = self.inner.geo.read().query_within_radius(center, radius_m);

        let mut hits = Vec::with_capacity(limit.min(candidates.len()));
        for (spot_id, distance_m) in candidates {
            if hits.len() == limit {
                break;
            }
            match self.inner.ledger.is_available_at(spot_id, at) {
                Ok(true) => {
                    // A spot mid-deletion may already be gone from the store;
                    // it is no longer offerable.
                    if let Some(spot) = self.inner.store.get_spot(spot_id) {
                        hits.push(NearbySpot { spot, distance_m });
                    }
                }
                Ok(false) => {}
                Err(ParkadeError::SpotNotFound(_)) => {}
                Err(other) => return Err(other),
            }
        }
        Ok(hits)
    }

    /// Current occupancy counters.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            lot_count: self.inner.store.lot_count(),
            spot_count: self.inner.store.spot_count(),
            reservation_count: self.inner.ledger.reservation_count(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReservationStatus;
    use std::time::{Duration, UNIX_EPOCH};

    fn t(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn delhi() -> Point {
        Point::new(77.2090, 28.6139)
    }

    #[test]
    fn test_create_and_list_lots() {
        let engine = Engine::new();
        let a = engine.create_lot("First", delhi()).unwrap();
        let b = engine.create_lot("Second", delhi()).unwrap();

        assert_eq!(engine.get_lot(a.id).unwrap().name, "First");
        let names: Vec<String> = engine.list_lots().into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["First", "Second"]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_lot_validates_input() {
        let engine = Engine::new();

        assert!(matches!(
            engine.create_lot("   ", delhi()),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.create_lot("Bad", Point::new(200.0, 28.6)),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.create_lot("Bad", Point::new(f64::NAN, 28.6)),
            Err(ParkadeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_spot_requires_existing_lot() {
        let engine = Engine::new();
        assert!(matches!(
            engine.create_spot(LotId::new(), "A-1", SpotCategory::Car),
            Err(ParkadeError::LotNotFound(_))
        ));

        let lot = engine.create_lot("Central", delhi()).unwrap();
        assert!(matches!(
            engine.create_spot(lot.id, "", SpotCategory::Car),
            Err(ParkadeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duplicate_number_rolls_back_cleanly() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();

        let err = engine
            .create_spot(lot.id, "A-1", SpotCategory::Bike)
            .unwrap_err();
        assert!(matches!(err, ParkadeError::DuplicateSpotNumber { .. }));

        // The failed attempt must leave no trace in the search index.
        let hits = engine.search_available(&delhi(), 100.0, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(engine.stats().spot_count, 1);
    }

    #[test]
    fn test_reservation_lifecycle() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();

        let reservation = engine.reserve(spot.id, t(100), t(200), "KA01AB1234").unwrap();
        assert_eq!(
            engine.get_reservation(reservation.id).unwrap().status,
            ReservationStatus::Active
        );
        assert!(!engine.is_spot_available_at(spot.id, t(150)).unwrap());

        let ended = engine.end_reservation(reservation.id).unwrap();
        assert_eq!(ended.status, ReservationStatus::Ended);
        assert!(engine.is_spot_available_at(spot.id, t(150)).unwrap());

        assert!(matches!(
            engine.end_reservation(reservation.id),
            Err(ParkadeError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_delete_lot_cascades() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();
        let reservation = engine.reserve(spot.id, t(100), t(200), "X").unwrap();

        engine.delete_lot(lot.id).unwrap();

        assert!(matches!(
            engine.get_lot(lot.id),
            Err(ParkadeError::LotNotFound(_))
        ));
        assert!(matches!(
            engine.get_spot(spot.id),
            Err(ParkadeError::SpotNotFound(_))
        ));
        assert!(matches!(
            engine.get_reservation(reservation.id),
            Err(ParkadeError::ReservationNotFound(_))
        ));
        assert!(matches!(
            engine.reserve(spot.id, t(300), t(400), "Y"),
            Err(ParkadeError::SpotNotFound(_))
        ));
        assert!(engine.search_available(&delhi(), 1_000.0, None).unwrap().is_empty());

        let stats = engine.stats();
        assert_eq!(stats.lot_count, 0);
        assert_eq!(stats.spot_count, 0);
        assert_eq!(stats.reservation_count, 0);
    }

    #[test]
    fn test_search_orders_and_limits() {
        let engine = Engine::new();
        let near = engine.create_lot("Near", delhi()).unwrap();
        let far = engine
            .create_lot("Far", Point::new(77.2295, 28.6129))
            .unwrap();
        let near_spot = engine.create_spot(near.id, "N-1", SpotCategory::Car).unwrap();
        let far_spot = engine.create_spot(far.id, "F-1", SpotCategory::Car).unwrap();

        let hits = engine
            .search_available_at(&delhi(), 5_000.0, None, t(0))
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].spot.id, near_spot.id);
        assert_eq!(hits[1].spot.id, far_spot.id);
        assert!(hits[0].distance_m < hits[1].distance_m);

        let hits = engine
            .search_available_at(&delhi(), 5_000.0, Some(1), t(0))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].spot.id, near_spot.id);
    }

    #[test]
    fn test_search_respects_availability_instant() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();
        engine.reserve(spot.id, t(100), t(200), "X").unwrap();

        assert!(engine
            .search_available_at(&delhi(), 1_000.0, None, t(150))
            .unwrap()
            .is_empty());
        assert_eq!(
            engine
                .search_available_at(&delhi(), 1_000.0, None, t(200))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_search_validates_radius_and_limit() {
        let engine = Engine::new();

        assert!(matches!(
            engine.search_available_at(&delhi(), -1.0, None, t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.search_available_at(&delhi(), 0.0, None, t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.search_available_at(&delhi(), f64::NAN, None, t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
        // Default config caps the radius at 20km.
        assert!(matches!(
            engine.search_available_at(&delhi(), 50_000.0, None, t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.search_available_at(&delhi(), 1_000.0, Some(0), t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.search_available_at(&delhi(), 1_000.0, Some(1_000), t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.search_available_at(&Point::new(f64::NAN, 28.6), 1_000.0, None, t(0)),
            Err(ParkadeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_default_limit_from_config() {
        let config = Config::default().with_default_search_limit(3);
        let engine = Engine::with_config(config).unwrap();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        for i in 0..5 {
            engine
                .create_spot(lot.id, &format!("A-{}", i), SpotCategory::Car)
                .unwrap();
        }

        let hits = engine
            .search_available_at(&delhi(), 1_000.0, None, t(0))
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_release_spot_at() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();
        let reservation = engine.reserve(spot.id, t(100), t(200), "X").unwrap();

        assert!(engine.release_spot_at(spot.id, t(50)).unwrap().is_none());
        let released = engine.release_spot_at(spot.id, t(150)).unwrap().unwrap();
        assert_eq!(released.id, reservation.id);
        assert_eq!(released.status, ReservationStatus::Ended);
        assert!(engine.is_spot_available_at(spot.id, t(150)).unwrap());
    }

    #[test]
    fn test_reserve_now_spans_from_the_clock() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();

        let reservation = engine
            .reserve_now(spot.id, Duration::from_secs(3600), "X")
            .unwrap();
        assert_eq!(
            reservation.end,
            reservation.start + Duration::from_secs(3600)
        );
        assert!(!engine.is_spot_available(spot.id).unwrap());

        assert_eq!(
            engine
                .reserve_now(spot.id, Duration::from_secs(0), "Y")
                .unwrap_err(),
            ParkadeError::InvalidInterval
        );
    }

    #[test]
    fn test_active_reservations_at_instant() {
        let engine = Engine::new();
        let lot = engine.create_lot("Central", delhi()).unwrap();
        let spot = engine.create_spot(lot.id, "A-1", SpotCategory::Car).unwrap();

        let morning = engine.reserve(spot.id, t(100), t(200), "A").unwrap();
        engine.reserve(spot.id, t(300), t(400), "B").unwrap();

        let covering = engine.active_reservations_at(spot.id, t(150)).unwrap();
        assert_eq!(covering.len(), 1);
        assert_eq!(covering[0].id, morning.id);
        assert!(
            engine
                .active_reservations_at(spot.id, t(250))
                .unwrap()
                .is_empty()
        );

        assert_eq!(engine.active_reservations(spot.id).unwrap().len(), 2);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = Config::default().with_max_search_radius_m(-5.0);
        assert!(matches!(
            Engine::with_config(config),
            Err(ParkadeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let engine = Engine::new();
        let clone = engine.clone();

        let lot = engine.create_lot("Central", delhi()).unwrap();
        assert_eq!(clone.get_lot(lot.id).unwrap().name, "Central");
    }
}
