//! Facade crate for the ride estimation engine.
//!
//! This crate re-exports the core domain types and, behind the `http` feature,
//! the openrouteservice and OSRM routing clients.

#![forbid(unsafe_code)]

pub use ride_core::{
    Coordinate, CoordinateError, DEFAULT_RATE_PER_MINUTE, DEFAULT_REGION, DriverEstimate,
    DriverRecord, EnrichedMarker, EstimationError, EstimatorConfig, Leg, MAX_OFFSET_DEGREES,
    Marker, PADDING_FACTOR, PerMinutePricing, PricingStrategy, Region, RetryPolicy, Route,
    RouteEstimator, RouteResult, RouteSegment, RoutingClient, RoutingError, SINGLE_POINT_DELTA,
    TravelProfile, UnknownProfile, compute_region, format_price, synthesize, synthesize_markers,
};

#[cfg(feature = "http")]
pub use ride_data::{
    ClientBuildError, HttpRoutingConfig, OrsRoutingClient, OsrmRoutingClient, RoutingBackend,
    UnknownBackend, build_routing_client,
};
