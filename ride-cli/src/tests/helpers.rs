//! Test helpers for writing ride requests into scratch directories.

use camino::{Utf8Path, Utf8PathBuf};
use ride_core::{Coordinate, DriverRecord};
use tempfile::TempDir;

use crate::request::RideRequest;

pub(super) const RIDER: (f64, f64) = (37.788_25, -122.4324);
pub(super) const DESTINATION: (f64, f64) = (37.7749, -122.4194);

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

pub(super) fn point((latitude, longitude): (f64, f64)) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("fixture coordinate must be valid")
}

/// A request with a rider, a destination and `drivers` drivers numbered from 1.
pub(super) fn sample_request(drivers: u64) -> RideRequest {
    RideRequest {
        rider: Some(point(RIDER)),
        destination: Some(point(DESTINATION)),
        drivers: (1..=drivers)
            .map(|id| DriverRecord {
                car_seats: 4,
                rating: 4.5,
                ..DriverRecord::new(id, "Driver", id.to_string())
            })
            .collect(),
    }
}

/// Scratch directory holding a single `request.json`.
#[derive(Debug)]
pub(super) struct RequestDir {
    _tmp: TempDir,
    root: Utf8PathBuf,
    request_path: Utf8PathBuf,
}

impl RequestDir {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let request_path = root.join("request.json");
        Self {
            _tmp: tmp,
            root,
            request_path,
        }
    }

    pub(super) fn with_request(request: &RideRequest) -> Self {
        let dir = Self::new();
        dir.write_request(request);
        dir
    }

    pub(super) fn write_request(&self, request: &RideRequest) {
        let payload = serde_json::to_string_pretty(request).expect("serialise request");
        write_utf8(&self.request_path, payload.as_bytes());
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn request_path(&self) -> Utf8PathBuf {
        self.request_path.clone()
    }
}
