//! `estimate` command: price every driver's trip through a routing service.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use ride_core::{
    DriverEstimate, EnrichedMarker, EstimatorConfig, RetryPolicy, RouteEstimator, RoutingClient,
    TravelProfile,
};
use ride_data::routing::{HttpRoutingConfig, RoutingBackend, build_routing_client};
use serde::{Deserialize, Serialize};

use crate::markers::place_markers;
use crate::request::{load_request, require_existing, write_output};
use crate::{
    ARG_MAX_ATTEMPTS, ARG_OUTPUT, ARG_PARTIAL, ARG_PROFILE, ARG_REQUEST, ARG_ROUTING_API_KEY,
    ARG_ROUTING_BACKEND, ARG_ROUTING_BASE_URL, ARG_SEED, ARG_TIMEOUT_SECS, CliError,
    ENV_ESTIMATE_REQUEST,
};

/// CLI arguments for the `estimate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Place the request's drivers around the rider, then query a \
                 routing service for each driver's pickup and drop-off legs \
                 and print the travel time and fare per driver. The whole \
                 estimate fails on the first driver error unless --partial \
                 is set.",
    about = "Estimate trip time and fare per driver"
)]
#[ortho_config(prefix = "RIDE")]
pub(crate) struct EstimateArgs {
    /// Path to a JSON ride request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Routing service: `ors` or `osrm`.
    #[arg(long = ARG_ROUTING_BACKEND, value_name = "name")]
    #[serde(default)]
    pub(crate) routing_backend: Option<String>,
    /// Routing service base URL; defaults to the backend's public endpoint.
    #[arg(long = ARG_ROUTING_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) routing_base_url: Option<String>,
    /// API key sent in the `Authorization` header.
    #[arg(long = ARG_ROUTING_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) routing_api_key: Option<String>,
    /// Travel profile: `driving`, `cycling` or `walking`.
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Attempts per routing query, including the first.
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Deadline per routing query, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Seed for reproducible marker offsets.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Report each driver's outcome instead of failing on the first error.
    #[arg(
        long = ARG_PARTIAL,
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "bool"
    )]
    #[serde(default)]
    pub(crate) partial: Option<bool>,
    /// Write the JSON result to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl EstimateArgs {
    pub(crate) fn into_config(self) -> Result<EstimateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        EstimateConfig::try_from(merged)
    }
}

/// Resolved `estimate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EstimateConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Routing service to query.
    pub(crate) backend: RoutingBackend,
    /// HTTP settings for the routing client.
    pub(crate) http: HttpRoutingConfig,
    /// Profile and retry settings for the estimator.
    pub(crate) estimator: EstimatorConfig,
    /// Marker seed, if any.
    pub(crate) seed: Option<u64>,
    /// Whether to report per-driver outcomes.
    pub(crate) partial: bool,
    /// Output file, if not stdout.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<EstimateArgs> for EstimateConfig {
    type Error = CliError;

    fn try_from(args: EstimateArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_ESTIMATE_REQUEST,
        })?;

        let backend = args
            .routing_backend
            .as_deref()
            .map(str::parse::<RoutingBackend>)
            .transpose()?
            .unwrap_or_default();
        let profile = args
            .profile
            .as_deref()
            .map(str::parse::<TravelProfile>)
            .transpose()?
            .unwrap_or_default();

        let base_url = args
            .routing_base_url
            .unwrap_or_else(|| backend.default_base_url().to_owned());
        let mut http = HttpRoutingConfig::new(base_url);
        if let Some(key) = args.routing_api_key {
            http = http.with_api_key(key);
        }

        let mut retry = RetryPolicy::default();
        if let Some(attempts) = args.max_attempts {
            retry = retry.with_max_attempts(attempts);
        }
        if let Some(secs) = args.timeout_secs {
            let timeout = Duration::from_secs(secs);
            http = http.with_timeout(timeout);
            retry = retry.with_per_call_timeout(Some(timeout));
        }

        Ok(Self {
            request_path,
            backend,
            http,
            estimator: EstimatorConfig::default()
                .with_profile(profile)
                .with_retry(retry),
            seed: args.seed,
            partial: args.partial.unwrap_or(false),
            output: args.output,
        })
    }
}

/// Builds the routing client for the current estimate invocation.
pub(crate) trait RoutingClientBuilder {
    fn build(&self, config: &EstimateConfig) -> Result<Box<dyn RoutingClient>, CliError>;
}

pub(crate) struct HttpRoutingClientBuilder;

impl RoutingClientBuilder for HttpRoutingClientBuilder {
    fn build(&self, config: &EstimateConfig) -> Result<Box<dyn RoutingClient>, CliError> {
        build_routing_client(config.backend, config.http.clone()).map_err(|source| {
            CliError::BuildRoutingClient {
                base_url: config.http.base_url.clone(),
                source,
            }
        })
    }
}

/// One driver's line in `--partial` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum DriverOutcome {
    /// The driver was estimated.
    Estimated {
        /// Driver identifier.
        driver_id: u64,
        /// The enriched marker.
        #[serde(flatten)]
        marker: EnrichedMarker,
    },
    /// The driver could not be estimated.
    Failed {
        /// Driver identifier.
        driver_id: u64,
        /// Why the estimate failed.
        error: String,
    },
}

impl From<DriverEstimate> for DriverOutcome {
    fn from(estimate: DriverEstimate) -> Self {
        match estimate.outcome {
            Ok(marker) => Self::Estimated {
                driver_id: estimate.driver_id,
                marker,
            },
            Err(err) => Self::Failed {
                driver_id: estimate.driver_id,
                error: err.to_string(),
            },
        }
    }
}

/// Result printed by the `estimate` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum EstimateOutput {
    /// Every driver, in request order.
    All(Vec<EnrichedMarker>),
    /// Per-driver outcomes, in request order.
    Partial(Vec<DriverOutcome>),
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_estimate_with(args, &HttpRoutingClientBuilder, &mut stdout)
}

pub(crate) fn run_estimate_with(
    args: EstimateArgs,
    builder: &dyn RoutingClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.request_path, ARG_REQUEST)?;
    let output = execute_estimate(&config, builder)?;
    write_output(writer, config.output.as_ref(), &output)
}

fn execute_estimate(
    config: &EstimateConfig,
    builder: &dyn RoutingClientBuilder,
) -> Result<EstimateOutput, CliError> {
    let request = load_request(&config.request_path)?;
    let markers = place_markers(&request, config.seed);
    let client = builder.build(config)?;
    let estimator = RouteEstimator::new(client).with_config(config.estimator);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    log::info!(
        "estimating {} drivers via {} ({})",
        markers.len(),
        config.backend,
        config.estimator.profile
    );
    if config.partial {
        let estimates = runtime.block_on(estimator.estimate_each(
            &markers,
            request.rider,
            request.destination,
        ))?;
        Ok(EstimateOutput::Partial(
            estimates.into_iter().map(DriverOutcome::from).collect(),
        ))
    } else {
        let enriched =
            runtime.block_on(estimator.estimate(&markers, request.rider, request.destination))?;
        Ok(EstimateOutput::All(enriched))
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<EstimateConfig, CliError> {
    let merged = EstimateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    EstimateConfig::try_from(merged)
}
