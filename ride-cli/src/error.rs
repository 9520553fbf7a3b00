//! Error types emitted by the `ride` CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use ride_core::{EstimationError, UnknownProfile};
use ride_data::routing::{ClientBuildError, UnknownBackend};
use thiserror::Error;

/// Errors emitted by the `ride` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that also supplies it.
        env: &'static str,
    },
    /// The request path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// The request path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// The request path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the request file failed.
    #[error("failed to open ride request at {path:?}: {source}")]
    OpenRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse ride request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The configured routing backend is not recognised.
    #[error(transparent)]
    InvalidBackend(#[from] UnknownBackend),
    /// The configured travel profile is not recognised.
    #[error(transparent)]
    InvalidProfile(#[from] UnknownProfile),
    /// Constructing the routing client failed.
    #[error("failed to build routing client for {base_url:?}: {source}")]
    BuildRoutingClient {
        /// Base URL the client was built for.
        base_url: String,
        /// Construction error.
        #[source]
        source: ClientBuildError,
    },
    /// Building the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Estimation failed for the request as a whole.
    #[error("estimation failed: {0}")]
    Estimate(#[from] EstimationError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Creating the output file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
