//! Query an external routing service for travel times.
//!
//! The [`RoutingClient`] trait abstracts a single directed routing query
//! between two [`Coordinate`](crate::Coordinate) values. Responses carry zero
//! or more routes, each with zero or more timed segments; consumers decide
//! what counts as a usable answer.
//!
//! HTTP implementations live in the `ride-data` crate.

mod client;
mod error;

pub use client::{
    Route, RouteResult, RouteSegment, RoutingClient, TravelProfile, UnknownProfile,
};
pub use error::RoutingError;
