//! Map viewport framing the rider and their destination.

use geo::Rect;

use crate::Coordinate;

/// Span used when only a single point (or none) is known.
pub const SINGLE_POINT_DELTA: f64 = 0.01;

/// Factor applied to the rider/destination bounding box spans.
pub const PADDING_FACTOR: f64 = 1.3;

/// Viewport shown before the rider's location is known (downtown San Francisco).
pub const DEFAULT_REGION: Region = Region {
    latitude: 37.788_25,
    longitude: -122.4324,
    latitude_delta: SINGLE_POINT_DELTA,
    longitude_delta: SINGLE_POINT_DELTA,
};

/// A rectangular map area described by its centre and span in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Centre latitude.
    pub latitude: f64,
    /// Centre longitude.
    pub longitude: f64,
    /// Vertical span; never negative.
    pub latitude_delta: f64,
    /// Horizontal span; never negative.
    pub longitude_delta: f64,
}

impl Region {
    /// A region of [`SINGLE_POINT_DELTA`] span centred on `point`.
    #[must_use]
    pub const fn around(point: Coordinate) -> Self {
        Self {
            latitude: point.latitude(),
            longitude: point.longitude(),
            latitude_delta: SINGLE_POINT_DELTA,
            longitude_delta: SINGLE_POINT_DELTA,
        }
    }
}

/// Compute the viewport for the current rider and destination.
///
/// - No rider: [`DEFAULT_REGION`], whatever the destination.
/// - Rider only: a [`SINGLE_POINT_DELTA`] view around the rider.
/// - Both: the bounding box of the two points padded by
///   [`PADDING_FACTOR`], centred on their midpoint.
///
/// Identical rider and destination give zero deltas; no minimum span is
/// applied here.
///
/// # Examples
/// ```
/// use ride_core::{compute_region, Coordinate, DEFAULT_REGION};
///
/// # fn main() -> Result<(), ride_core::CoordinateError> {
/// assert_eq!(compute_region(None, None), DEFAULT_REGION);
///
/// let rider = Coordinate::new(10.0, 20.0)?;
/// let destination = Coordinate::new(12.0, 24.0)?;
/// let region = compute_region(Some(rider), Some(destination));
/// assert_eq!(region.latitude, 11.0);
/// assert_eq!(region.longitude, 22.0);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "viewport padding scales floating-point spans"
)]
pub fn compute_region(rider: Option<Coordinate>, destination: Option<Coordinate>) -> Region {
    let Some(rider_point) = rider else {
        return DEFAULT_REGION;
    };
    let Some(destination_point) = destination else {
        return Region::around(rider_point);
    };

    // `Rect::new` normalises the corners, so width/height are never negative.
    let bounds = Rect::new(rider_point, destination_point);
    let centre = rider_point.midpoint(&destination_point);

    Region {
        latitude: centre.latitude(),
        longitude: centre.longitude(),
        latitude_delta: bounds.height() * PADDING_FACTOR,
        longitude_delta: bounds.width() * PADDING_FACTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn point(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    #[rstest]
    #[case(None)]
    #[case(Some(point(40.0, -74.0)))]
    fn missing_rider_yields_default(#[case] destination: Option<Coordinate>) {
        assert_eq!(compute_region(None, destination), DEFAULT_REGION);
    }

    #[rstest]
    fn rider_only_centres_on_rider() {
        let rider = point(51.5, -0.12);
        let region = compute_region(Some(rider), None);
        assert_eq!(region.latitude, 51.5);
        assert_eq!(region.longitude, -0.12);
        assert_eq!(region.latitude_delta, SINGLE_POINT_DELTA);
        assert_eq!(region.longitude_delta, SINGLE_POINT_DELTA);
    }

    #[rstest]
    fn pads_spans_regardless_of_point_order() {
        let rider = point(10.0, 24.0);
        let destination = point(12.0, 20.0);
        let forward = compute_region(Some(rider), Some(destination));
        let backward = compute_region(Some(destination), Some(rider));

        assert_eq!(forward.latitude_delta, 2.0 * PADDING_FACTOR);
        assert_eq!(forward.longitude_delta, 4.0 * PADDING_FACTOR);
        assert_eq!(forward, backward);
    }

    #[rstest]
    fn identical_points_collapse_to_zero_span() {
        let rider = point(1.0, 1.0);
        let region = compute_region(Some(rider), Some(rider));
        assert_eq!(region.latitude_delta, 0.0);
        assert_eq!(region.longitude_delta, 0.0);
        assert_eq!(region.latitude, 1.0);
    }
}
