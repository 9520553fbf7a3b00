//! OSRM route service client.
//!
//! Queries `GET {base}/route/v1/{profile}/{lng},{lat};{lng},{lat}` and maps
//! each route leg onto a [`RouteSegment`]. The response `code` field is
//! `"Ok"` on success. `"NoRoute"` yields an empty [`RouteResult`], so callers
//! see an unroutable leg rather than a failed service; any other code is a
//! service error.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use async_trait::async_trait;
use reqwest::Client;
use ride_core::{
    Coordinate, Route, RouteResult, RouteSegment, RoutingClient, RoutingError, TravelProfile,
};
use serde::Deserialize;

use super::config::{ClientBuildError, HttpRoutingConfig};
use super::http::{build_client, convert_reqwest_error, read_json};

/// OSRM profile name for `profile`.
#[must_use]
pub const fn profile_name(profile: TravelProfile) -> &'static str {
    match profile {
        TravelProfile::Driving => "driving",
        TravelProfile::Cycling => "cycling",
        TravelProfile::Walking => "foot",
    }
}

/// Response code OSRM uses when no route connects the coordinates.
const NO_ROUTE: &str = "NoRoute";

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    /// `"Ok"` on success, e.g. `"NoRoute"` or `"InvalidQuery"` otherwise.
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    duration: Option<f64>,
    distance: Option<f64>,
}

fn service_error_from_body(body: &str) -> Option<(String, String)> {
    serde_json::from_str::<RouteResponse>(body)
        .ok()
        .filter(|response| !response.is_ok())
        .map(|response| (response.code, response.message.unwrap_or_default()))
}

fn convert_response(response: RouteResponse) -> Result<RouteResult, RoutingError> {
    if response.code == NO_ROUTE {
        return Ok(RouteResult::default());
    }
    if !response.is_ok() {
        return Err(RoutingError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let routes = response
        .routes
        .into_iter()
        .map(|route| Route {
            segments: route
                .legs
                .into_iter()
                .map_while(|leg| {
                    leg.duration.map(|duration_secs| RouteSegment {
                        duration_secs,
                        distance_m: leg.distance,
                    })
                })
                .collect(),
        })
        .collect();
    Ok(RouteResult { routes })
}

/// [`RoutingClient`] backed by an OSRM route service.
#[derive(Debug, Clone)]
pub struct OsrmRoutingClient {
    client: Client,
    base_url: String,
    config: HttpRoutingConfig,
}

impl OsrmRoutingClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the base URL or API key is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: HttpRoutingConfig) -> Result<Self, ClientBuildError> {
        let base_url = config.normalised_base_url()?;
        let client = build_client(&config)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpRoutingConfig {
        &self.config
    }

    fn route_url(&self, from: Coordinate, to: Coordinate, profile: TravelProfile) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.base_url,
            profile_name(profile),
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: TravelProfile,
    ) -> Result<RouteResult, RoutingError> {
        let url = self.route_url(from, to, profile);
        log::debug!("requesting {profile} route from {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let route = read_json(response, &url, self.config.timeout, service_error_from_body).await;
        recover_no_route(route.and_then(convert_response))
    }
}

// OSRM reports `NoRoute` with an HTTP 400, which `read_json` turns into a
// service error before the body reaches `convert_response`.
fn recover_no_route(
    result: Result<RouteResult, RoutingError>,
) -> Result<RouteResult, RoutingError> {
    match result {
        Err(RoutingError::ServiceError { code, message }) if code == NO_ROUTE => {
            log::debug!("OSRM found no route: {message}");
            Ok(RouteResult::default())
        }
        other => other,
    }
}
