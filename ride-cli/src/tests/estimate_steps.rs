//! Behaviour-driven step definitions driving the estimate CLI scenarios.

use std::cell::RefCell;
use std::sync::Arc;

use super::helpers::{RIDER, RequestDir, point, sample_request, write_utf8};
use super::*;
use crate::estimate::{EstimateConfig, RoutingClientBuilder, run_estimate_with};
use ride_core::test_support::StubRoutingClient;
use ride_core::{EnrichedMarker, EstimationError, RoutingClient, RoutingError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

#[derive(Debug)]
struct EstimateWorld {
    dir: RequestDir,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    client: RefCell<Option<Arc<StubRoutingClient>>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl EstimateWorld {
    fn new() -> Self {
        Self {
            dir: RequestDir::new(),
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            client: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["ride".to_owned(), "estimate".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.dir.request_path().into_string());
        }
        argv.extend([format!("--{ARG_SEED}"), "3".to_owned()]);
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn stdout_json(&self) -> Value {
        serde_json::from_slice(&self.stdout.borrow()).expect("stdout should be JSON")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            match result.as_ref().expect("result recorded") {
                Ok(()) => panic!("expected the command to fail"),
                Err(err) => err,
            }
        })
    }
}

#[fixture]
fn world() -> EstimateWorld {
    EstimateWorld::new()
}

struct SharedStubBuilder {
    client: Arc<StubRoutingClient>,
}

impl RoutingClientBuilder for SharedStubBuilder {
    fn build(&self, _config: &EstimateConfig) -> Result<Box<dyn RoutingClient>, CliError> {
        Ok(Box::new(Arc::clone(&self.client)))
    }
}

#[given("a ride request with two drivers exists on disk")]
fn ride_request_exists(#[from(world)] world: &EstimateWorld) {
    world.dir.write_request(&sample_request(2));
}

#[given("the ride request JSON is invalid")]
fn ride_request_is_invalid(#[from(world)] world: &EstimateWorld) {
    write_utf8(&world.dir.request_path(), b"{ \"rider\": ");
}

#[given("I omit the request path")]
fn omit_request_path(#[from(world)] world: &EstimateWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("a routing service answering every leg in ten minutes")]
fn routing_answers_in_ten_minutes(#[from(world)] world: &EstimateWorld) {
    world
        .client
        .replace(Some(Arc::new(StubRoutingClient::new(600.0))));
}

#[given("a routing service that rejects every drop-off leg")]
fn routing_rejects_dropoff(#[from(world)] world: &EstimateWorld) {
    let error = RoutingError::ServiceError {
        code: "2010".to_owned(),
        message: "no routable point".to_owned(),
    };
    world.client.replace(Some(Arc::new(
        StubRoutingClient::new(600.0).fail_from(point(RIDER), error),
    )));
}

#[given("I ask for partial results")]
fn ask_for_partial_results(#[from(world)] world: &EstimateWorld) {
    world
        .cli_args
        .borrow_mut()
        .push(format!("--{ARG_PARTIAL}"));
}

#[given("I select an unknown routing backend")]
fn select_unknown_backend(#[from(world)] world: &EstimateWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_ROUTING_BACKEND}"),
        "graphhopper".to_owned(),
    ]);
}

#[when("I run the estimate command")]
fn run_estimate_command(#[from(world)] world: &EstimateWorld) {
    let client = world
        .client
        .borrow()
        .clone()
        .expect("a routing service should be configured");
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Estimate(args) => {
            let builder = SharedStubBuilder { client };
            let mut buffer = world.stdout.borrow_mut();
            run_estimate_with(args, &builder, &mut *buffer)
        }
        Command::Region(_) | Command::Markers(_) => panic!("expected estimate command"),
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints two drivers priced at 10.00")]
fn command_prints_priced_drivers(#[from(world)] world: &EstimateWorld) {
    assert!(
        matches!(*world.result.borrow(), Some(Ok(()))),
        "expected success"
    );
    let enriched: Vec<EnrichedMarker> =
        serde_json::from_value(world.stdout_json()).expect("output should list enriched markers");
    let prices: Vec<&str> = enriched.iter().map(|item| item.price.as_str()).collect();
    assert_eq!(prices, vec!["10.00", "10.00"]);
}

#[then("the command succeeds and reports every driver as failed")]
fn command_reports_failures(#[from(world)] world: &EstimateWorld) {
    assert!(
        matches!(*world.result.borrow(), Some(Ok(()))),
        "expected success"
    );
    let output = world.stdout_json();
    let statuses: Vec<Option<&str>> = output
        .as_array()
        .expect("partial output should be an array")
        .iter()
        .map(|entry| entry.get("status").and_then(Value::as_str))
        .collect();
    assert_eq!(statuses, vec![Some("failed"), Some("failed")]);
}

#[then("the command fails because a driver could not be routed")]
fn command_fails_routing(#[from(world)] world: &EstimateWorld) {
    match &*world.error() {
        CliError::Estimate(EstimationError::Transport { .. }) => {}
        other => panic!("expected Transport, found {other:?}"),
    }
    assert!(world.stdout.borrow().is_empty());
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &EstimateWorld) {
    match &*world.error() {
        CliError::ParseRequest { .. } => {}
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &EstimateWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the routing backend is unknown")]
fn command_fails_unknown_backend(#[from(world)] world: &EstimateWorld) {
    match &*world.error() {
        CliError::InvalidBackend(unknown) => assert_eq!(unknown.0, "graphhopper"),
        other => panic!("expected InvalidBackend, found {other:?}"),
    }
}

macro_rules! register_estimate_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/estimate_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: EstimateWorld) {
            let _ = world;
        }
    };
}

register_estimate_scenario!(estimate_happy_path, "estimating a request from JSON");
register_estimate_scenario!(estimate_partial, "reporting per-driver failures");
register_estimate_scenario!(estimate_all_or_nothing, "failing the whole estimate");
register_estimate_scenario!(estimate_invalid_json, "rejecting invalid JSON input");
register_estimate_scenario!(estimate_missing_request, "rejecting missing request paths");
register_estimate_scenario!(estimate_unknown_backend, "rejecting unknown routing backends");
