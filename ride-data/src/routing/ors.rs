//! openrouteservice directions client.
//!
//! Queries `POST {base}/v2/directions/{profile}/geojson` with a two-point
//! coordinate list and reads `features[].properties.segments[].duration`.
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/v2/directions>

use async_trait::async_trait;
use reqwest::Client;
use ride_core::{
    Coordinate, Route, RouteResult, RouteSegment, RoutingClient, RoutingError, TravelProfile,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::{ClientBuildError, HttpRoutingConfig};
use super::http::{build_client, convert_reqwest_error, read_json};

/// openrouteservice profile name for `profile`.
#[must_use]
pub const fn profile_name(profile: TravelProfile) -> &'static str {
    match profile {
        TravelProfile::Driving => "driving-car",
        TravelProfile::Cycling => "cycling-regular",
        TravelProfile::Walking => "foot-walking",
    }
}

/// Request body: coordinates as `[longitude, latitude]` pairs.
#[derive(Debug, Serialize, PartialEq)]
struct DirectionsRequest {
    coordinates: [[f64; 2]; 2],
}

impl DirectionsRequest {
    const fn new(from: Coordinate, to: Coordinate) -> Self {
        Self {
            coordinates: [
                [from.longitude(), from.latitude()],
                [to.longitude(), to.latitude()],
            ],
        }
    }
}

/// GeoJSON directions response.
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    duration: Option<f64>,
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Value,
}

/// Pull `(code, message)` out of an openrouteservice error value.
///
/// The service reports either `{"code": 2010, "message": "..."}` or a bare
/// message string.
fn service_error(error: &Value) -> (String, String) {
    match error {
        Value::Object(fields) => {
            let code = fields.get("code").map_or_else(String::new, |code| match code {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            });
            let message = fields
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            (code, message)
        }
        Value::String(message) => (String::new(), message.clone()),
        other => (String::new(), other.to_string()),
    }
}

fn service_error_from_body(body: &str) -> Option<(String, String)> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| service_error(&envelope.error))
}

fn convert_response(response: DirectionsResponse) -> Result<RouteResult, RoutingError> {
    if let Some(error) = response.error {
        let (code, message) = service_error(&error);
        return Err(RoutingError::ServiceError { code, message });
    }
    let routes = response
        .features
        .into_iter()
        .map(|feature| Route {
            segments: feature
                .properties
                .segments
                .into_iter()
                // A segment without a duration ends the usable breakdown.
                .map_while(|segment| {
                    segment.duration.map(|duration_secs| RouteSegment {
                        duration_secs,
                        distance_m: segment.distance,
                    })
                })
                .collect(),
        })
        .collect();
    Ok(RouteResult { routes })
}

/// [`RoutingClient`] backed by the openrouteservice directions API.
#[derive(Debug, Clone)]
pub struct OrsRoutingClient {
    client: Client,
    base_url: String,
    config: HttpRoutingConfig,
}

impl OrsRoutingClient {
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

    fn directions_url(&self, profile: TravelProfile) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            self.base_url,
            profile_name(profile)
        )
    }
}

#[async_trait]
impl RoutingClient for OrsRoutingClient {
    async fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
        profile: TravelProfile,
    ) -> Result<RouteResult, RoutingError> {
        let url = self.directions_url(profile);
        log::debug!("requesting {profile} directions from {url}");
        let response = self
            .client
            .post(&url)
            .json(&DirectionsRequest::new(from, to))
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.timeout))?;
        let directions: DirectionsResponse =
            read_json(response, &url, self.config.timeout, service_error_from_body).await?;
        convert_response(directions)
    }
}
