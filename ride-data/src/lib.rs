//! HTTP routing clients for the ride estimation engine.
//!
//! The [`routing`] module implements [`ride_core::RoutingClient`] over
//! openrouteservice and OSRM.

#![forbid(unsafe_code)]

pub mod routing;

pub use routing::{
    ClientBuildError, HttpRoutingConfig, OrsRoutingClient, OsrmRoutingClient, RoutingBackend,
    UnknownBackend, build_routing_client,
};
