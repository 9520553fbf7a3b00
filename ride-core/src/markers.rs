//! Place driver records around the rider.
//!
//! The driver listing has no live positions, so each marker is scattered
//! uniformly within [`MAX_OFFSET_DEGREES`] of the rider on both axes.
//! Re-synthesising moves the markers, which stands in for driver movement.

use rand::Rng;
use rand::distributions::{Distribution, Standard};

use crate::{Coordinate, DriverRecord, Marker};

/// Largest offset, in degrees, applied on each axis.
pub const MAX_OFFSET_DEGREES: f64 = 0.005;

/// Build one marker per driver using the thread-local random source.
///
/// Output order follows `drivers`. Positions differ between calls.
#[must_use]
pub fn synthesize(drivers: &[DriverRecord], rider: Coordinate) -> Vec<Marker> {
    synthesize_markers(drivers, rider, &mut rand::thread_rng())
}

/// Build one marker per driver drawing offsets from `rng`.
///
/// Each axis offset is `(u - 0.5) * 0.01` for `u` uniform in `[0, 1)`, so
/// a seeded generator reproduces the same markers.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use ride_core::{synthesize_markers, Coordinate, DriverRecord};
///
/// # fn main() -> Result<(), ride_core::CoordinateError> {
/// let rider = Coordinate::new(37.7, -122.4)?;
/// let drivers = vec![DriverRecord::new(1, "Ada", "Lovelace")];
/// let first = synthesize_markers(&drivers, rider, &mut ChaCha8Rng::seed_from_u64(9));
/// let again = synthesize_markers(&drivers, rider, &mut ChaCha8Rng::seed_from_u64(9));
/// assert_eq!(first, again);
/// # Ok(())
/// # }
/// ```
pub fn synthesize_markers<R>(
    drivers: &[DriverRecord],
    rider: Coordinate,
    rng: &mut R,
) -> Vec<Marker>
where
    R: Rng + ?Sized,
{
    drivers
        .iter()
        .map(|driver| {
            let latitude_offset = draw_offset(rng);
            let longitude_offset = draw_offset(rng);
            Marker::new(
                driver.clone(),
                rider.offset_by(latitude_offset, longitude_offset),
            )
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "offset is a scaled uniform sample"
)]
fn draw_offset<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let sample: f64 = Standard.sample(rng);
    (sample - 0.5) * (MAX_OFFSET_DEGREES * 2.0)
}
