//! Shared configuration for the HTTP routing clients.

use std::time::Duration;

use thiserror::Error;

/// Default base URL, the public openrouteservice endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "ride-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing an HTTP routing client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The base URL could not be parsed.
    #[error("invalid routing base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The API key is not a valid header value.
    #[error("routing API key contains characters not allowed in a header")]
    InvalidApiKey(#[source] reqwest::header::InvalidHeaderValue),
    /// The underlying HTTP client failed to build.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connection settings for [`crate::routing::OrsRoutingClient`] and
/// [`crate::routing::OsrmRoutingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoutingConfig {
    /// Service root, e.g. `"https://api.openrouteservice.org"`.
    pub base_url: String,
    /// Key sent in the `Authorization` header, when the service needs one.
    pub api_key: Option<String>,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpRoutingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRoutingConfig {
    /// Configuration targeting `base_url` with default settings otherwise.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL without trailing slashes, validated as an absolute URL.
    pub(crate) fn normalised_base_url(&self) -> Result<String, ClientBuildError> {
        let trimmed = self.base_url.trim_end_matches('/');
        url::Url::parse(trimmed).map_err(|source| ClientBuildError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        Ok(trimmed.to_owned())
    }
}
