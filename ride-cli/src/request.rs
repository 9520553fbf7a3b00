//! Ride request input and JSON output shared by every subcommand.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use ride_core::{Coordinate, DriverRecord};
use serde::{Deserialize, Serialize};

use crate::CliError;
use crate::fs::{create_utf8_file, file_is_file, open_utf8_file};

/// Rider, destination and candidate drivers read from a request file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct RideRequest {
    /// Rider location, if known.
    #[serde(default)]
    pub(crate) rider: Option<Coordinate>,
    /// Trip destination, if chosen.
    #[serde(default)]
    pub(crate) destination: Option<Coordinate>,
    /// Driver listing.
    #[serde(default)]
    pub(crate) drivers: Vec<DriverRecord>,
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load a JSON-encoded [`RideRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<RideRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` as JSON to `output` when set, otherwise to `writer`.
pub(crate) fn write_output<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    output: Option<&Utf8PathBuf>,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    match output {
        Some(path) => {
            let mut file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            write_payload(&mut file, &payload)?;
            log::info!("wrote output to {path}");
            Ok(())
        }
        None => write_payload(writer, &payload),
    }
}

fn write_payload(writer: &mut dyn Write, payload: &str) -> Result<(), CliError> {
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    writer.flush().map_err(CliError::WriteOutput)
}
