//! Deterministic routing double for unit, behaviour and doc tests.
//!
//! [`StubRoutingClient`] answers every query with a fixed single-segment
//! route unless a script registered for the query's origin says otherwise.
//! It never touches the network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{Coordinate, RouteResult, RoutingClient, RoutingError, TravelProfile};

#[derive(Debug)]
enum Script {
    Respond(RouteResult),
    Fail(RoutingError),
    FailTimes {
        remaining: AtomicUsize,
        error: RoutingError,
    },
}

/// Stub `RoutingClient` with per-origin scripted answers.
///
/// Scripts are matched on the exact `from` coordinate of a query. The
/// estimator's first leg starts at the driver's marker and the second at the
/// rider, so scripting a marker position targets one driver's pickup leg and
/// scripting the rider targets every drop-off leg.
///
/// # Examples
/// ```
/// use ride_core::test_support::StubRoutingClient;
/// use ride_core::{Coordinate, RoutingClient, RoutingError, TravelProfile};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let origin = Coordinate::new(1.0, 1.0)?;
/// let target = Coordinate::new(2.0, 2.0)?;
/// let client = StubRoutingClient::new(30.0).fail_from(
///     origin,
///     RoutingError::ParseError { message: "scripted".to_owned() },
/// );
///
/// let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
/// let result = runtime.block_on(client.route(origin, target, TravelProfile::Driving));
/// assert!(result.is_err());
/// assert_eq!(client.calls(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StubRoutingClient {
    leg_secs: f64,
    delay: Option<Duration>,
    scripts: Vec<(Coordinate, Script)>,
    calls: AtomicUsize,
    profiles: Mutex<Vec<TravelProfile>>,
}

impl StubRoutingClient {
    /// Answer every unscripted query with one segment of `leg_secs` seconds.
    #[must_use]
    pub fn new(leg_secs: f64) -> Self {
        Self {
            leg_secs,
            delay: None,
            scripts: Vec::new(),
            calls: AtomicUsize::new(0),
            profiles: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` before answering each query.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Return `result` for every query starting at `from`.
    #[must_use]
    pub fn respond_from(self, from: Coordinate, result: RouteResult) -> Self {
        self.script(from, Script::Respond(result))
    }

    /// Fail every query starting at `from` with `error`.
    #[must_use]
    pub fn fail_from(self, from: Coordinate, error: RoutingError) -> Self {
        self.script(from, Script::Fail(error))
    }

    /// Fail the first `times` queries starting at `from`, then answer normally.
    #[must_use]
    pub fn fail_times_from(self, from: Coordinate, times: usize, error: RoutingError) -> Self {
        self.script(
            from,
            Script::FailTimes {
                remaining: AtomicUsize::new(times),
                error,
            },
        )
    }

    /// Number of queries received so far, including failed ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Profiles of every query received so far, in arrival order.
    #[must_use]
    pub fn profiles(&self) -> Vec<TravelProfile> {
        self.profiles
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    fn script(mut self, from: Coordinate, script: Script) -> Self {
        self.scripts.push((from, script));
        self
    }

    fn answer(&self, from: Coordinate) -> Result<RouteResult, RoutingError> {
        let script = self
            .scripts
            .iter()
            .find(|(origin, _)| *origin == from)
            .map(|(_, script)| script);
        match script {
            Some(Script::Respond(result)) => Ok(result.clone()),
            Some(Script::Fail(error)) => Err(error.clone()),
            Some(Script::FailTimes { remaining, error }) => {
                let consumed = remaining
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                        left.checked_sub(1)
                    })
                    .is_ok();
                if consumed {
                    Err(error.clone())
                } else {
                    Ok(RouteResult::single(self.leg_secs))
                }
            }
            None => Ok(RouteResult::single(self.leg_secs)),
        }
    }
}

#[async_trait]
impl RoutingClient for StubRoutingClient {
    async fn route(
        &self,
        from: Coordinate,
        _to: Coordinate,
        profile: TravelProfile,
    ) -> Result<RouteResult, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.profiles.lock() {
            seen.push(profile);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(from)
    }
}
