//! Geographic coordinates and the distance/containment primitives.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A point on the Earth in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// Coordinates compare by value, so two stops fetched from different
/// queries at the same position are equal.
///
/// # Examples
///
/// ```
/// use waldo_server::domain::Coordinate;
///
/// let ubc = Coordinate::new(49.2606, -123.2460).unwrap();
/// assert_eq!(ubc.latitude(), 49.2606);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude and longitude must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }

        // Fold -0.0 into 0.0 so equality and hashing agree.
        Ok(Self {
            latitude: latitude + 0.0,
            longitude: longitude + 0.0,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle (haversine) distance to `other`, in metres.
    ///
    /// Symmetric, non-negative, and exactly zero for equal coordinates.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_M * c
    }

    /// Whether this point lies inside the rectangle whose opposite corners
    /// are `a` and `b`, edges included.
    pub fn is_between(&self, a: &Coordinate, b: &Coordinate) -> bool {
        let (lat_lo, lat_hi) = min_max(a.latitude, b.latitude);
        let (lon_lo, lon_hi) = min_max(a.longitude, b.longitude);

        (lat_lo..=lat_hi).contains(&self.latitude) && (lon_lo..=lon_hi).contains(&self.longitude)
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

// Construction rejects NaN, so bitwise hashing is consistent with `==`.
impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
