//! Routing client trait and the route shapes it returns.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Coordinate;

use super::error::RoutingError;

/// Travel mode requested from the routing service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelProfile {
    /// Car routing.
    #[default]
    Driving,
    /// Bicycle routing.
    Cycling,
    /// Pedestrian routing.
    Walking,
}

impl TravelProfile {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Cycling => "cycling",
            Self::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown profile name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel profile {0:?} (expected driving, cycling or walking)")]
pub struct UnknownProfile(pub String);

impl FromStr for TravelProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "cycling" | "bike" => Ok(Self::Cycling),
            "walking" | "foot" => Ok(Self::Walking),
            other => Err(UnknownProfile(other.to_owned())),
        }
    }
}

/// One stretch of a route with its travel time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSegment {
    /// Travel time in seconds as reported by the service.
    pub duration_secs: f64,
    /// Segment length in metres, when reported.
    pub distance_m: Option<f64>,
}

impl RouteSegment {
    /// A segment with only a duration.
    #[must_use]
    pub const fn from_secs(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            distance_m: None,
        }
    }
}

/// One candidate route between two coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    /// Ordered segments; an empty list means the service gave no breakdown.
    pub segments: Vec<RouteSegment>,
}

/// Response to a single routing query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResult {
    /// Candidate routes, best first. May be empty.
    pub routes: Vec<Route>,
}

impl RouteResult {
    /// A result holding one route with one segment of `duration_secs`.
    ///
    /// # Examples
    /// ```
    /// use ride_core::RouteResult;
    ///
    /// let result = RouteResult::single(90.0);
    /// assert_eq!(result.first_segment_duration(), Some(90.0));
    /// ```
    #[must_use]
    pub fn single(duration_secs: f64) -> Self {
        Self {
            routes: vec![Route {
                segments: vec![RouteSegment::from_secs(duration_secs)],
            }],
        }
    }

    /// Duration in seconds of the first segment of the first route.
    ///
    /// Returns `None` when there is no route, no segment, or the duration is
    /// zero, negative or not finite. A missing duration is never read as zero.
    /// Any other value, however large, is returned as is.
    #[must_use]
    pub fn first_segment_duration(&self) -> Option<f64> {
        self.routes
            .first()?
            .segments
            .first()
            .map(|segment| segment.duration_secs)
            .filter(|secs| secs.is_finite() && *secs > 0.0)
    }
}

/// Compute a route between two coordinates.
///
/// Implementations own their own latency and failure behaviour; callers wrap
/// them with retries and deadlines as needed.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use ride_core::{Coordinate, RouteResult, RoutingClient, RoutingError, TravelProfile};
///
/// struct FixedClient;
///
/// #[async_trait]
/// impl RoutingClient for FixedClient {
///     async fn route(
///         &self,
///         _from: Coordinate,
///         _to: Coordinate,
///         _profile: TravelProfile,
///     ) -> Result<RouteResult, RoutingError> {
///         Ok(RouteResult::single(60.0))
///     }
/// }
/// ```
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Route from `from` to `to` using `profile`.
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: TravelProfile,
    ) -> Result<RouteResult, RoutingError>;
}

#[async_trait]
impl<C> RoutingClient for Box<C>
where
    C: RoutingClient + ?Sized,
{
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: TravelProfile,
    ) -> Result<RouteResult, RoutingError> {
        (**self).route(from, to, profile).await
    }
}

#[async_trait]
impl<C> RoutingClient for Arc<C>
where
    C: RoutingClient + ?Sized,
{
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: TravelProfile,
    ) -> Result<RouteResult, RoutingError> {
        (**self).route(from, to, profile).await
    }
}
