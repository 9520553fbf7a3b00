use std::fmt;

use thiserror::Error;

use crate::RoutingError;

/// The two routing queries issued for every driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Leg {
    /// From the driver's position to the rider.
    ToRider,
    /// From the rider to the destination.
    ToDestination,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ToRider => "to_rider",
            Self::ToDestination => "to_destination",
        })
    }
}

/// Errors returned by [`crate::RouteEstimator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    /// Rider or destination was not supplied; no routing query was made.
    #[error("rider and destination locations are both required")]
    MissingLocation,
    /// The routing response held no usable duration for a leg.
    #[error("driver {driver_id}: {leg} route has no usable duration")]
    InvalidRoute {
        /// Driver whose estimate failed.
        driver_id: u64,
        /// Leg that produced the unusable response.
        leg: Leg,
    },
    /// The routing client failed, after any retries.
    #[error("driver {driver_id}: {leg} routing failed: {source}")]
    Transport {
        /// Driver whose estimate failed.
        driver_id: u64,
        /// Leg whose query failed.
        leg: Leg,
        /// Last error reported by the routing client.
        #[source]
        source: RoutingError,
    },
}

impl EstimationError {
    /// Driver the failure is attributed to, if any.
    #[must_use]
    pub const fn driver_id(&self) -> Option<u64> {
        match self {
            Self::MissingLocation => None,
            Self::InvalidRoute { driver_id, .. } | Self::Transport { driver_id, .. } => {
                Some(*driver_id)
            }
        }
    }
}
