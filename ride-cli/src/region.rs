//! `region` command: print the map viewport for a request.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use ride_core::{Region, compute_region};
use serde::{Deserialize, Serialize};

use crate::request::{load_request, require_existing, write_output};
use crate::{ARG_OUTPUT, ARG_REQUEST, CliError, ENV_REGION_REQUEST};

/// CLI arguments for the `region` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compute the map viewport framing the rider and destination \
                 in a ride request. Without a rider location the default \
                 region is printed.",
    about = "Print the map viewport for a ride request"
)]
#[ortho_config(prefix = "RIDE")]
pub(crate) struct RegionArgs {
    /// Path to a JSON ride request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Write the JSON result to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

/// Resolved `region` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegionConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<RegionArgs> for RegionConfig {
    type Error = CliError;

    fn try_from(args: RegionArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REGION_REQUEST,
        })?;
        Ok(Self {
            request_path,
            output: args.output,
        })
    }
}

pub(crate) fn run_region(args: RegionArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_region_with(args, &mut stdout)
}

pub(crate) fn run_region_with(args: RegionArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = RegionConfig::try_from(merged)?;
    require_existing(&config.request_path, ARG_REQUEST)?;
    let region = region_for(&config)?;
    write_output(writer, config.output.as_ref(), &region)
}

fn region_for(config: &RegionConfig) -> Result<Region, CliError> {
    let request = load_request(&config.request_path)?;
    Ok(compute_region(request.rider, request.destination))
}
