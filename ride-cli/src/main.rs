//! Entry point for the `ride` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use ride_cli::CliError;

fn main() -> ExitCode {
    ride_cli::init_logging();
    match ride_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => report(&err),
    }
}

#[expect(clippy::print_stderr, reason = "the binary reports fatal errors on stderr")]
fn report(err: &CliError) -> ExitCode {
    eprintln!("ride: {err}");
    ExitCode::FAILURE
}
