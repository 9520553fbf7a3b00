use thiserror::Error;

/// Errors from [`crate::routing::RoutingClient::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The request did not complete within its deadline.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL, or a description of the call for non-HTTP clients.
        url: String,
        /// Deadline that elapsed, in whole seconds.
        timeout_secs: u64,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The service answered but reported a routing failure.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Service-specific error code.
        code: String,
        /// Human-readable message from the service.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}

impl RoutingError {
    /// Whether repeating the same request might succeed.
    ///
    /// Timeouts, network failures, rate limiting (429) and server-side
    /// (5xx) statuses are transient. Service and parse errors are not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::NetworkError { .. } => true,
            Self::HttpError { status, .. } => *status == 429 || *status >= 500,
            Self::ServiceError { .. } | Self::ParseError { .. } => false,
        }
    }
}
