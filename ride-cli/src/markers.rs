//! `markers` command: scatter the request's drivers around the rider.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ride_core::{Marker, synthesize, synthesize_markers};
use serde::{Deserialize, Serialize};

use crate::request::{RideRequest, load_request, require_existing, write_output};
use crate::{ARG_OUTPUT, ARG_REQUEST, ARG_SEED, CliError, ENV_MARKERS_REQUEST};

/// CLI arguments for the `markers` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Place every driver in a ride request at a random offset \
                 of at most 0.005 degrees from the rider. Pass --seed for \
                 reproducible positions.",
    about = "Print driver markers around the rider"
)]
#[ortho_config(prefix = "RIDE")]
pub(crate) struct MarkersArgs {
    /// Path to a JSON ride request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Seed for reproducible marker offsets.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Write the JSON result to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

/// Resolved `markers` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkersConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) seed: Option<u64>,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<MarkersArgs> for MarkersConfig {
    type Error = CliError;

    fn try_from(args: MarkersArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_MARKERS_REQUEST,
        })?;
        Ok(Self {
            request_path,
            seed: args.seed,
            output: args.output,
        })
    }
}

pub(crate) fn run_markers(args: MarkersArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_markers_with(args, &mut stdout)
}

pub(crate) fn run_markers_with(args: MarkersArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = MarkersConfig::try_from(merged)?;
    require_existing(&config.request_path, ARG_REQUEST)?;
    let request = load_request(&config.request_path)?;
    let markers = place_markers(&request, config.seed);
    write_output(writer, config.output.as_ref(), &markers)
}

/// Synthesise markers for `request`, seeded when `seed` is set.
///
/// Without a rider location there is nothing to place drivers around, so no
/// markers are produced.
pub(crate) fn place_markers(request: &RideRequest, seed: Option<u64>) -> Vec<Marker> {
    let Some(rider) = request.rider else {
        log::warn!("ride request has no rider location; no markers placed");
        return Vec::new();
    };
    match seed {
        Some(value) => {
            let mut rng = ChaCha8Rng::seed_from_u64(value);
            synthesize_markers(&request.drivers, rider, &mut rng)
        }
        None => synthesize(&request.drivers, rider),
    }
}
