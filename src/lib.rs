//! Embedded parking reservation engine with conflict-checked bookings and geographic search.
//!
//! ```rust
//! use parkade::{Parkade, Point, SpotCategory};
//! use std::time::{Duration, SystemTime};
//!
//! let engine = Parkade::new();
//! let lot = engine.create_lot("Connaught Place", Point::new(77.2090, 28.6139))?;
//! let spot = engine.create_spot(lot.id, "A-12", SpotCategory::Car)?;
//!
//! let noon = SystemTime::now();
//! engine.reserve(spot.id, noon, noon + Duration::from_secs(7200), "DL8CAF1234")?;
//! let later = noon + Duration::from_secs(7200);
//! let nearby = engine.search_available_at(&lot.position, 1_000.0, None, later)?;
//! assert_eq!(nearby.len(), 1);
//! # Ok::<(), parkade::ParkadeError>(())
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod index;
pub mod ledger;
pub mod spatial;
pub mod store;
pub mod types;

pub use builder::EngineBuilder;
pub use engine::Engine;
pub use error::{ParkadeError, Result};

pub type Parkade = Engine;

pub use geo::Point;

pub use spatial::{distance_m, validate_point};

pub use index::GeoIndex;

pub use ledger::ReservationLedger;

pub use store::SpotStore;

pub use types::{
    Config, EngineStats, LotId, NearbySpot, ParkingLot, ParkingSpot, Reservation, ReservationId,
    ReservationStatus, SpotCategory, SpotId,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{EngineBuilder, Parkade, ParkadeError, Result};

    pub use geo::Point;

    pub use crate::spatial::distance_m;

    pub use crate::{Config, NearbySpot, Reservation, ReservationStatus, SpotCategory};

    pub use crate::{LotId, ReservationId, SpotId};

    pub use std::time::{Duration, SystemTime};
}
