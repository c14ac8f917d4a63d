//! Error types shared across the engine.

use crate::types::{LotId, ReservationId, ReservationStatus, SpotId};
use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, ParkadeError>;

/// All errors the engine can return.
///
/// Every variant reflects a domain decision, not a transient fault: callers
/// must not retry blindly. `Conflict` means the requested interval is taken,
/// `InvalidState` means the reservation already reached a terminal state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParkadeError {
    #[error("lot not found: {0}")]
    LotNotFound(LotId),

    #[error("spot not found: {0}")]
    SpotNotFound(SpotId),

    #[error("reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    #[error("unknown spot category: {0:?}")]
    InvalidCategory(String),

    #[error("reservation end must be strictly after start")]
    InvalidInterval,

    #[error("spot {spot} has an overlapping active reservation {existing}")]
    Conflict {
        spot: SpotId,
        existing: ReservationId,
    },

    #[error("reservation {reservation} is already {status}")]
    InvalidState {
        reservation: ReservationId,
        status: ReservationStatus,
    },

    #[error("spot number {number:?} already exists in lot {lot}")]
    DuplicateSpotNumber { lot: LotId, number: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ParkadeError {
    /// True for any missing-entity variant, whichever id type failed to
    /// resolve. Shells typically map these to a single "404" response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LotNotFound(_) | Self::SpotNotFound(_) | Self::ReservationNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found_covers_all_entities() {
        assert!(ParkadeError::LotNotFound(LotId::new()).is_not_found());
        assert!(ParkadeError::SpotNotFound(SpotId::new()).is_not_found());
        assert!(ParkadeError::ReservationNotFound(ReservationId::new()).is_not_found());
        assert!(!ParkadeError::InvalidInterval.is_not_found());
        assert!(!ParkadeError::InvalidCategory("truck".to_string()).is_not_found());
    }

    #[test]
    fn test_display_messages() {
        let err = ParkadeError::InvalidCategory("truck".to_string());
        assert_eq!(err.to_string(), "unknown spot category: \"truck\"");

        let reservation = ReservationId::new();
        let err = ParkadeError::InvalidState {
            reservation,
            status: ReservationStatus::Ended,
        };
        assert_eq!(
            err.to_string(),
            format!("reservation {} is already ended", reservation)
        );
    }
}
