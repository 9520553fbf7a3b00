//! Request plumbing shared by the routing clients.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use ride_core::RoutingError;
use serde::de::DeserializeOwned;

use super::config::{ClientBuildError, HttpRoutingConfig};

/// Build a `reqwest` client honouring `config`.
pub(crate) fn build_client(config: &HttpRoutingConfig) -> Result<Client, ClientBuildError> {
    let mut headers = HeaderMap::new();
    if let Some(key) = &config.api_key {
        let mut value = HeaderValue::from_str(key).map_err(ClientBuildError::InvalidApiKey)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .connect_timeout(config.timeout)
        .timeout(config.timeout)
        .build()?)
}

/// Map a transport failure onto the routing error taxonomy.
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> RoutingError {
    if error.is_timeout() {
        return RoutingError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return RoutingError::HttpError {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    RoutingError::NetworkError {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Map a non-success HTTP status to an error.
///
/// Client errors whose body carries a service error code become
/// [`RoutingError::ServiceError`]; rate limiting and server errors stay
/// [`RoutingError::HttpError`] so they remain retryable.
pub(crate) fn status_error(
    url: &str,
    status: u16,
    body: &str,
    service_error: Option<(String, String)>,
) -> RoutingError {
    let retryable = status == 429 || status >= 500;
    match service_error {
        Some((code, message)) if !retryable => RoutingError::ServiceError { code, message },
        Some((_, message)) => RoutingError::HttpError {
            url: url.to_owned(),
            status,
            message,
        },
        None => RoutingError::HttpError {
            url: url.to_owned(),
            status,
            message: body.trim().to_owned(),
        },
    }
}

/// Read a response, returning its decoded body or a mapped error.
///
/// `service_error` extracts a `(code, message)` pair from an error body.
pub(crate) async fn read_json<T, E>(
    response: Response,
    url: &str,
    timeout: Duration,
    service_error: E,
) -> Result<T, RoutingError>
where
    T: DeserializeOwned,
    E: FnOnce(&str) -> Option<(String, String)>,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| convert_reqwest_error(&err, url, timeout))?;
    if !status.is_success() {
        log::debug!("routing request to {url} returned {status}");
        let service = service_error(&body);
        return Err(status_error(url, status.as_u16(), &body, service));
    }
    parse_body(&body)
}

/// Decode a JSON body.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, RoutingError> {
    serde_json::from_str(body).map_err(|err| RoutingError::ParseError {
        message: err.to_string(),
    })
}
