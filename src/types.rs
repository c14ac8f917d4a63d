//! Core types and configuration for parkade
//!
//! This module defines the identifier newtypes, the lot/spot/reservation
//! records, and the serializable engine configuration.

use crate::error::ParkadeError;
use geo::Point;
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use uuid::Uuid;

/// Unique identifier of a parking lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(Uuid);

impl LotId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for LotId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Unique identifier of a parking spot.
///
/// Spot ids are `Ord`; search results use that ordering as the tie-break
/// between equidistant spots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(Uuid);

impl SpotId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SpotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for SpotId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Unique identifier of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ReservationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Kind of vehicle a spot accommodates.
///
/// The set is closed; shells parsing user input go through [`FromStr`] and
/// get [`ParkadeError::InvalidCategory`] for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotCategory {
    Car,
    Bike,
    Ev,
}

impl SpotCategory {
    /// Every category, in declaration order.
    pub const ALL: [SpotCategory; 3] = [Self::Car, Self::Bike, Self::Ev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bike => "bike",
            Self::Ev => "ev",
        }
    }
}

impl fmt::Display for SpotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpotCategory {
    type Err = ParkadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(Self::Car),
            "bike" => Ok(Self::Bike),
            "ev" => Ok(Self::Ev),
            other => Err(ParkadeError::InvalidCategory(other.to_string())),
        }
    }
}

/// Lifecycle state of a reservation.
///
/// Transitions are one-way: `Active` may move to `Ended` or `Cancelled`,
/// both of which are terminal. Mutating a terminal reservation fails with
/// [`ParkadeError::InvalidState`] rather than silently no-opping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Initial state; the reservation claims its interval.
    #[default]
    Active,
    /// The stay completed normally.
    Ended,
    /// The claim was withdrawn.
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical parking facility with a single geographic coordinate.
///
/// Lots are immutable after creation; deleting one cascades to its spots
/// and their reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: LotId,
    pub name: String,
    /// Facility coordinate; `x` is longitude, `y` is latitude.
    pub position: Point,
}

impl ParkingLot {
    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }
}

/// An individually reservable unit within a lot.
///
/// A spot belongs to exactly one lot, fixed at creation. There is no stored
/// availability flag: availability is derived from the reservation ledger at
/// read time, so it can never drift from reservation truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: SpotId,
    pub lot_id: LotId,
    /// Human-facing label, unique within the owning lot.
    pub number: String,
    pub category: SpotCategory,
}

/// A claim on a spot for the half-open time interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub spot_id: SpotId,
    pub start: SystemTime,
    pub end: SystemTime,
    /// Vehicle plate. Opaque to the engine; never validated.
    pub plate: String,
    pub status: ReservationStatus,
}

impl Reservation {
    /// Interval containment, half-open: `start <= at < end`.
    pub fn covers(&self, at: SystemTime) -> bool {
        self.start <= at && at < self.end
    }

    /// Strict intersection test against another half-open interval.
    ///
    /// Back-to-back intervals (`self.end == start`) do not overlap.
    pub fn overlaps(&self, start: SystemTime, end: SystemTime) -> bool {
        self.start < end && start < self.end
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }
}

/// A search hit: the spot plus its haversine distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySpot {
    pub spot: ParkingSpot,
    pub distance_m: f64,
}

/// Engine configuration
///
/// Designed to be easily serializable and loadable from JSON, TOML, or
/// other formats while keeping complexity minimal.
///
/// # Example
///
/// ```rust
/// use parkade::Config;
///
/// // Create default config
/// let config = Config::default();
///
/// // Load from JSON
/// let json = r#"{
///     "max_search_radius_m": 5000.0,
///     "default_search_limit": 10
/// }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Largest radius a search may request, in meters
    #[serde(default = "Config::default_max_search_radius_m")]
    pub max_search_radius_m: f64,

    /// Result cap applied when a search does not pass an explicit limit
    #[serde(default = "Config::default_search_limit")]
    pub default_search_limit: usize,

    /// Largest result limit a search may request
    #[serde(default = "Config::default_max_search_limit")]
    pub max_search_limit: usize,
}

impl Config {
    const fn default_max_search_radius_m() -> f64 {
        20_000.0
    }

    const fn default_search_limit() -> usize {
        20
    }

    const fn default_max_search_limit() -> usize {
        100
    }

    pub fn with_max_search_radius_m(mut self, radius_m: f64) -> Self {
        self.max_search_radius_m = radius_m;
        self
    }

    pub fn with_default_search_limit(mut self, limit: usize) -> Self {
        self.default_search_limit = limit;
        self
    }

    pub fn with_max_search_limit(mut self, limit: usize) -> Self {
        self.max_search_limit = limit;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_search_radius_m.is_finite() {
            return Err("Max search radius must be finite (not NaN or infinity)".to_string());
        }

        if self.max_search_radius_m <= 0.0 {
            return Err("Max search radius must be positive".to_string());
        }

        if self.default_search_limit == 0 {
            return Err("Default search limit must be greater than zero".to_string());
        }

        if self.max_search_limit == 0 {
            return Err("Max search limit must be greater than zero".to_string());
        }

        if self.default_search_limit > self.max_search_limit {
            return Err("Default search limit cannot exceed max search limit".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_search_radius_m: Self::default_max_search_radius_m(),
            default_search_limit: Self::default_search_limit(),
            max_search_limit: Self::default_max_search_limit(),
        }
    }
}

/// Engine occupancy counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStats {
    /// Number of lots currently registered
    pub lot_count: usize,
    /// Number of spots across all lots
    pub spot_count: usize,
    /// Number of reservations on record, whatever their status
    pub reservation_count: usize,
}
