//! HTTP implementations of [`ride_core::RoutingClient`].
//!
//! Two services are supported:
//!
//! - [`OrsRoutingClient`] for openrouteservice directions, which needs an
//!   API key for the public endpoint.
//! - [`OsrmRoutingClient`] for an OSRM route service.
//!
//! Both share [`HttpRoutingConfig`] and map transport failures onto
//! [`ride_core::RoutingError`]. Neither retries; wrap them in a
//! [`ride_core::RouteEstimator`] with a [`ride_core::RetryPolicy`] for that.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use ride_data::routing::{HttpRoutingConfig, RoutingBackend, build_routing_client};
//! use ride_core::{Coordinate, RoutingClient, TravelProfile};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRoutingConfig::default()
//!     .with_api_key("your-ors-key")
//!     .with_timeout(Duration::from_secs(10));
//! let client = build_routing_client(RoutingBackend::Ors, config)?;
//!
//! let from = Coordinate::new(37.788, -122.432)?;
//! let to = Coordinate::new(37.774, -122.419)?;
//! let result = client.route(from, to, TravelProfile::Driving).await?;
//! println!("{:?} seconds", result.first_segment_duration());
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod ors;
mod osrm;

use std::fmt;
use std::str::FromStr;

use ride_core::RoutingClient;
use thiserror::Error;

pub use config::{ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpRoutingConfig};
pub use ors::{OrsRoutingClient, profile_name as ors_profile_name};
pub use osrm::{OsrmRoutingClient, profile_name as osrm_profile_name};

/// Public OSRM demo server.
pub const OSRM_DEMO_URL: &str = "https://router.project-osrm.org";

/// Routing service to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoutingBackend {
    /// openrouteservice directions API.
    #[default]
    Ors,
    /// OSRM route service.
    Osrm,
}

impl RoutingBackend {
    /// Base URL used when none is configured.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Ors => DEFAULT_BASE_URL,
            Self::Osrm => OSRM_DEMO_URL,
        }
    }
}

impl fmt::Display for RoutingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ors => "ors",
            Self::Osrm => "osrm",
        })
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown routing backend {0:?} (expected ors or osrm)")]
pub struct UnknownBackend(pub String);

impl FromStr for RoutingBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ors" | "openrouteservice" => Ok(Self::Ors),
            "osrm" => Ok(Self::Osrm),
            other => Err(UnknownBackend(other.to_owned())),
        }
    }
}

/// Build a boxed client for `backend`.
///
/// # Errors
///
/// Returns [`ClientBuildError`] when the client cannot be constructed.
pub fn build_routing_client(
    backend: RoutingBackend,
    config: HttpRoutingConfig,
) -> Result<Box<dyn RoutingClient>, ClientBuildError> {
    log::debug!("building {backend} routing client for {}", config.base_url);
    Ok(match backend {
        RoutingBackend::Ors => Box::new(OrsRoutingClient::new(config)?),
        RoutingBackend::Osrm => Box::new(OsrmRoutingClient::new(config)?),
    })
}
