//! Per-driver trip estimates from two routing queries.
//!
//! For every marker the estimator routes the driver to the rider and the
//! rider to the destination, sums both first-segment durations into minutes
//! and prices the trip. Drivers are processed concurrently on the caller's
//! runtime; nothing is spawned.

mod error;
mod retry;

use futures_util::future::{join_all, try_join_all};

use crate::pricing::{PerMinutePricing, PricingStrategy, format_price};
use crate::{Coordinate, EnrichedMarker, Marker, RoutingClient, TravelProfile};

pub use error::{EstimationError, Leg};
pub use retry::RetryPolicy;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Settings applied to every routing query made by a [`RouteEstimator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Travel mode for both legs.
    pub profile: TravelProfile,
    /// Retry and deadline behaviour per query.
    pub retry: RetryPolicy,
}

impl EstimatorConfig {
    /// Override the travel profile.
    #[must_use]
    pub const fn with_profile(mut self, profile: TravelProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Outcome for one driver when estimating in partial-success mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverEstimate {
    /// Driver the outcome belongs to.
    pub driver_id: u64,
    /// The enriched marker, or why it could not be produced.
    pub outcome: Result<EnrichedMarker, EstimationError>,
}

/// Enrich markers with travel time and fare using a [`RoutingClient`].
///
/// # Examples
/// ```
/// use ride_core::test_support::StubRoutingClient;
/// use ride_core::{Coordinate, DriverRecord, Marker, RouteEstimator};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let rider = Coordinate::new(37.78, -122.43)?;
/// let destination = Coordinate::new(37.80, -122.41)?;
/// let marker = Marker::new(DriverRecord::new(1, "Ada", "Lovelace"), rider);
///
/// let estimator = RouteEstimator::new(StubRoutingClient::new(600.0));
/// let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
/// let enriched = runtime.block_on(estimator.estimate(&[marker], Some(rider), Some(destination)))?;
/// assert_eq!(enriched[0].estimated_minutes, 20.0);
/// assert_eq!(enriched[0].price, "10.00");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RouteEstimator<C, P = PerMinutePricing> {
    client: C,
    pricing: P,
    config: EstimatorConfig,
}

impl<C: RoutingClient> RouteEstimator<C> {
    /// Estimator with default pricing and configuration.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            pricing: PerMinutePricing::default(),
            config: EstimatorConfig::default(),
        }
    }
}

impl<C, P> RouteEstimator<C, P>
where
    C: RoutingClient,
    P: PricingStrategy,
{
    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the fare rule.
    #[must_use]
    pub fn with_pricing<Q: PricingStrategy>(self, pricing: Q) -> RouteEstimator<C, Q> {
        RouteEstimator {
            client: self.client,
            pricing,
            config: self.config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The wrapped routing client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Estimate every marker, failing the whole batch on the first error.
    ///
    /// Output order matches `markers`. When one driver fails the remaining
    /// in-flight queries are dropped.
    ///
    /// # Errors
    ///
    /// [`EstimationError::MissingLocation`] when either location is absent,
    /// before any query is made; otherwise the first per-driver failure.
    pub async fn estimate(
        &self,
        markers: &[Marker],
        rider: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> Result<Vec<EnrichedMarker>, EstimationError> {
        let (pickup, dropoff) = require_locations(rider, destination)?;
        let enriched = try_join_all(
            markers
                .iter()
                .map(|marker| self.estimate_marker(marker, pickup, dropoff)),
        )
        .await?;
        log::info!("estimated {} drivers", enriched.len());
        Ok(enriched)
    }

    /// Estimate every marker independently, keeping per-driver failures.
    ///
    /// # Errors
    ///
    /// Only [`EstimationError::MissingLocation`]; driver failures are
    /// reported in each [`DriverEstimate::outcome`].
    pub async fn estimate_each(
        &self,
        markers: &[Marker],
        rider: Option<Coordinate>,
        destination: Option<Coordinate>,
    ) -> Result<Vec<DriverEstimate>, EstimationError> {
        let (pickup, dropoff) = require_locations(rider, destination)?;
        let estimates: Vec<DriverEstimate> = join_all(markers.iter().map(|marker| async move {
            DriverEstimate {
                driver_id: marker.driver_id(),
                outcome: self.estimate_marker(marker, pickup, dropoff).await,
            }
        }))
        .await;
        let failed = estimates.iter().filter(|e| e.outcome.is_err()).count();
        log::info!(
            "estimated {} drivers, {failed} failed",
            estimates.len().saturating_sub(failed)
        );
        Ok(estimates)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "minutes are derived from fractional seconds"
    )]
    async fn estimate_marker(
        &self,
        marker: &Marker,
        rider: Coordinate,
        destination: Coordinate,
    ) -> Result<EnrichedMarker, EstimationError> {
        let driver_id = marker.driver_id();
        let to_rider = self
            .leg_duration(driver_id, Leg::ToRider, marker.position, rider)
            .await?;
        let to_destination = self
            .leg_duration(driver_id, Leg::ToDestination, rider, destination)
            .await?;

        let estimated_minutes = (to_rider + to_destination) / SECONDS_PER_MINUTE;
        let price = format_price(self.pricing.price(estimated_minutes));
        Ok(EnrichedMarker {
            marker: marker.clone(),
            estimated_minutes,
            price,
        })
    }

    async fn leg_duration(
        &self,
        driver_id: u64,
        leg: Leg,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<f64, EstimationError> {
        let client = &self.client;
        let profile = self.config.profile;
        let target = format!("driver {driver_id} {leg}");
        let result = self
            .config
            .retry
            .run(&target, move || client.route(from, to, profile))
            .await
            .map_err(|source| {
                log::warn!("{target} routing failed: {source}");
                EstimationError::Transport {
                    driver_id,
                    leg,
                    source,
                }
            })?;

        let secs = result.first_segment_duration().ok_or_else(|| {
            log::warn!("{target} route has no usable duration");
            EstimationError::InvalidRoute { driver_id, leg }
        })?;
        log::debug!("{target} takes {secs}s");
        Ok(secs)
    }
}

fn require_locations(
    rider: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> Result<(Coordinate, Coordinate), EstimationError> {
    rider
        .zip(destination)
        .ok_or(EstimationError::MissingLocation)
}
