//! Shared test harness modules for the `ride` CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod estimate_steps;
mod estimate_unit;
mod helpers;
