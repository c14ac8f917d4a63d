//! Distance computation and coordinate validation.

use crate::error::{ParkadeError, Result};
use geo::{Distance, Haversine, Point};

/// Great-circle distance between two points, in meters.
///
/// Uses the haversine formula over Earth's mean radius. This treats the
/// Earth as a sphere, which is fine at lot-scale radii (hundreds to low
/// thousands of meters); callers must not assume geodesic exactness.
///
/// # Examples
///
/// ```
/// use parkade::spatial::distance_m;
/// use geo::Point;
///
/// let connaught_place = Point::new(77.2090, 28.6139);
/// let india_gate = Point::new(77.2295, 28.6129);
///
/// let d = distance_m(&connaught_place, &india_gate);
/// assert!((1_900.0..2_100.0).contains(&d));
/// ```
pub fn distance_m(a: &Point, b: &Point) -> f64 {
    Haversine.distance(*a, *b)
}

/// Validates a point has a usable longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use parkade::spatial::validate_point;
/// use geo::Point;
///
/// // Valid point
/// let delhi = Point::new(77.2090, 28.6139);
/// assert!(validate_point(&delhi).is_ok());
///
/// // Invalid longitude
/// let invalid = Point::new(200.0, 40.0);
/// assert!(validate_point(&invalid).is_err());
///
/// // Invalid latitude
/// let invalid = Point::new(77.0, 95.0);
/// assert!(validate_point(&invalid).is_err());
/// ```
pub fn validate_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(ParkadeError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(ParkadeError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(ParkadeError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(ParkadeError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}
