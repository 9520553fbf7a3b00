//! Command-line front end for the ride estimation engine.
//!
//! The `ride` binary reads a JSON ride request (rider, destination and driver
//! listing) and prints the map viewport, the synthesised driver markers or
//! per-driver trip estimates. Options layer from configuration files,
//! `RIDE_*` environment variables and flags.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod estimate;
mod fs;
mod markers;
mod region;
mod request;

pub use error::CliError;

use estimate::{EstimateArgs, run_estimate};
use markers::{MarkersArgs, run_markers};
use region::{RegionArgs, run_region};

const ARG_REQUEST: &str = "request";
const ARG_OUTPUT: &str = "output";
const ARG_SEED: &str = "seed";
const ARG_ROUTING_BACKEND: &str = "routing-backend";
const ARG_ROUTING_BASE_URL: &str = "routing-base-url";
const ARG_ROUTING_API_KEY: &str = "routing-api-key";
const ARG_PROFILE: &str = "profile";
const ARG_MAX_ATTEMPTS: &str = "max-attempts";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_PARTIAL: &str = "partial";
const ENV_REGION_REQUEST: &str = "RIDE_CMDS_REGION_REQUEST_PATH";
const ENV_MARKERS_REQUEST: &str = "RIDE_CMDS_MARKERS_REQUEST_PATH";
const ENV_ESTIMATE_REQUEST: &str = "RIDE_CMDS_ESTIMATE_REQUEST_PATH";

/// Log filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `tracing` subscriber that also captures `log` records.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
/// Calling this more than once is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        log::debug!("logging was already initialised");
    }
}

/// Run the `ride` CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration, the request file or
/// the estimation itself fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Region(args) => run_region(args),
        Command::Markers(args) => run_markers(args),
        Command::Estimate(args) => run_estimate(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "ride",
    about = "Viewport, marker and trip estimates for ride requests",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the map viewport framing rider and destination.
    Region(RegionArgs),
    /// Print driver markers scattered around the rider.
    Markers(MarkersArgs),
    /// Estimate trip time and fare per driver.
    Estimate(EstimateArgs),
}

#[cfg(test)]
mod tests;
