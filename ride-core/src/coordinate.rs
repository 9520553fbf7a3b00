//! WGS84 coordinates shared by every estimation step.

use geo::Coord;
use thiserror::Error;

const LATITUDE_LIMIT: f64 = 90.0;
const LONGITUDE_LIMIT: f64 = 180.0;
const FULL_TURN: f64 = 360.0;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Latitude lies in `[-90, 90]` and longitude in `[-180, 180]`; both are
/// finite. Values are immutable once constructed.
///
/// # Examples
/// ```
/// use ride_core::Coordinate;
///
/// # fn main() -> Result<(), ride_core::CoordinateError> {
/// let rider = Coordinate::new(37.78825, -122.4324)?;
/// assert_eq!(rider.latitude(), 37.78825);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was outside `[-90, 90]` or not finite.
    #[error("latitude {0} must be a finite value between -90 and 90")]
    Latitude(f64),
    /// Longitude was outside `[-180, 180]` or not finite.
    #[error("longitude {0} must be a finite value between -180 and 180")]
    Longitude(f64),
}

impl Coordinate {
    /// Validate and construct a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is out of range or
    /// not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-LATITUDE_LIMIT..=LATITUDE_LIMIT).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-LONGITUDE_LIMIT..=LONGITUDE_LIMIT).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Arithmetic midpoint of `self` and `other`.
    ///
    /// No antimeridian handling: the midpoint of two points either side of
    /// 180° longitude lands near 0°.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "midpoint is plain floating-point averaging"
    )]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            latitude: (self.latitude + other.latitude) / 2.0,
            longitude: (self.longitude + other.longitude) / 2.0,
        }
    }

    /// Shift the coordinate by the given deltas in degrees.
    ///
    /// Latitude saturates at the poles and longitude wraps across the
    /// antimeridian so the result always satisfies the range invariant.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "offsets and wrapping are floating-point degree arithmetic"
    )]
    pub fn offset_by(&self, latitude_delta: f64, longitude_delta: f64) -> Self {
        let latitude = (self.latitude + latitude_delta).clamp(-LATITUDE_LIMIT, LATITUDE_LIMIT);
        let mut longitude = self.longitude + longitude_delta;
        if longitude > LONGITUDE_LIMIT {
            longitude -= FULL_TURN;
        } else if longitude < -LONGITUDE_LIMIT {
            longitude += FULL_TURN;
        }
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}
