//! Core estimation engine for ride requests.
//!
//! Given a rider, a destination and a list of candidate drivers, the crate
//! frames a map viewport, scatters driver markers around the rider and asks a
//! [`RoutingClient`] for pickup and drop-off travel times to price each trip.
//!
//! Viewport and marker computations are synchronous and total. Estimation is
//! asynchronous and fans out across drivers on the caller's runtime.

#![forbid(unsafe_code)]

mod coordinate;
mod driver;
mod estimate;
mod markers;
mod pricing;
mod region;
pub mod routing;

#[doc(hidden)]
pub mod test_support;

pub use coordinate::{Coordinate, CoordinateError};
pub use driver::{DriverRecord, EnrichedMarker, Marker};
pub use estimate::{
    DriverEstimate, EstimationError, EstimatorConfig, Leg, RetryPolicy, RouteEstimator,
};
pub use markers::{MAX_OFFSET_DEGREES, synthesize, synthesize_markers};
pub use pricing::{DEFAULT_RATE_PER_MINUTE, PerMinutePricing, PricingStrategy, format_price};
pub use region::{DEFAULT_REGION, PADDING_FACTOR, Region, SINGLE_POINT_DELTA, compute_region};
pub use routing::{
    Route, RouteResult, RouteSegment, RoutingClient, RoutingError, TravelProfile, UnknownProfile,
};
