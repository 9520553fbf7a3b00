//! Focused unit tests covering estimate configuration and execution.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{RIDER, RequestDir, point, sample_request};
use super::*;
use crate::estimate::{
    EstimateArgs, EstimateConfig, HttpRoutingClientBuilder, RoutingClientBuilder,
    config_from_layers_for_test, run_estimate_with,
};
use crate::request::RideRequest;
use ride_core::test_support::StubRoutingClient;
use ride_core::{
    EnrichedMarker, EstimationError, Leg, RetryPolicy, RoutingClient, RoutingError, TravelProfile,
};
use ride_data::routing::{DEFAULT_BASE_URL, OSRM_DEMO_URL, RoutingBackend};
use rstest::{fixture, rstest};
use serde_json::Value;

/// Hands out one shared stub so tests can inspect the queries it saw.
struct StubBuilder {
    client: Arc<StubRoutingClient>,
}

impl RoutingClientBuilder for StubBuilder {
    fn build(&self, _config: &EstimateConfig) -> Result<Box<dyn RoutingClient>, CliError> {
        Ok(Box::new(Arc::clone(&self.client)))
    }
}

#[fixture]
fn ten_minute_legs() -> StubBuilder {
    StubBuilder {
        client: Arc::new(StubRoutingClient::new(600.0)),
    }
}

fn args_for(dir: &RequestDir) -> EstimateArgs {
    EstimateArgs {
        request_path: Some(dir.request_path()),
        seed: Some(11),
        ..EstimateArgs::default()
    }
}

fn run_with(args: EstimateArgs, builder: &StubBuilder) -> Result<Value, CliError> {
    let mut stdout = Vec::new();
    run_estimate_with(args, builder, &mut stdout)?;
    Ok(serde_json::from_slice(&stdout).expect("estimate output should be JSON"))
}

#[rstest]
fn converting_estimate_without_request_errors() {
    let err = EstimateConfig::try_from(EstimateArgs::default()).expect_err("missing request");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_ESTIMATE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn estimate_config_applies_defaults() {
    let args = EstimateArgs {
        request_path: Some("request.json".into()),
        ..EstimateArgs::default()
    };

    let config = EstimateConfig::try_from(args).expect("config should build");
    assert_eq!(config.backend, RoutingBackend::Ors);
    assert_eq!(config.http.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.http.api_key, None);
    assert_eq!(config.estimator.profile, TravelProfile::Driving);
    assert_eq!(config.estimator.retry, RetryPolicy::default());
    assert!(!config.partial);
    assert_eq!(config.seed, None);
}

#[rstest]
fn estimate_config_honours_routing_options() {
    let args = EstimateArgs {
        request_path: Some("request.json".into()),
        routing_backend: Some("osrm".to_owned()),
        routing_api_key: Some("secret".to_owned()),
        profile: Some("bike".to_owned()),
        max_attempts: Some(5),
        timeout_secs: Some(4),
        partial: Some(true),
        ..EstimateArgs::default()
    };

    let config = EstimateConfig::try_from(args).expect("config should build");
    assert_eq!(config.backend, RoutingBackend::Osrm);
    assert_eq!(config.http.base_url, OSRM_DEMO_URL);
    assert_eq!(config.http.api_key.as_deref(), Some("secret"));
    assert_eq!(config.http.timeout, Duration::from_secs(4));
    assert_eq!(config.estimator.profile, TravelProfile::Cycling);
    assert_eq!(config.estimator.retry.max_attempts, 5);
    assert_eq!(
        config.estimator.retry.per_call_timeout,
        Some(Duration::from_secs(4))
    );
    assert!(config.partial);
}

#[rstest]
fn explicit_base_url_overrides_backend_default() {
    let args = EstimateArgs {
        request_path: Some("request.json".into()),
        routing_backend: Some("osrm".to_owned()),
        routing_base_url: Some("http://localhost:5000".to_owned()),
        ..EstimateArgs::default()
    };

    let config = EstimateConfig::try_from(args).expect("config should build");
    assert_eq!(config.http.base_url, "http://localhost:5000");
}

#[rstest]
fn unknown_backend_is_rejected() {
    let args = EstimateArgs {
        request_path: Some("request.json".into()),
        routing_backend: Some("graphhopper".to_owned()),
        ..EstimateArgs::default()
    };

    let err = EstimateConfig::try_from(args).expect_err("unknown backend");
    match err {
        CliError::InvalidBackend(unknown) => assert_eq!(unknown.0, "graphhopper"),
        other => panic!("expected InvalidBackend, found {other:?}"),
    }
}

#[rstest]
fn unknown_profile_is_rejected() {
    let args = EstimateArgs {
        request_path: Some("request.json".into()),
        profile: Some("hovercraft".to_owned()),
        ..EstimateArgs::default()
    };

    let err = EstimateConfig::try_from(args).expect_err("unknown profile");
    match err {
        CliError::InvalidProfile(unknown) => assert_eq!(unknown.0, "hovercraft"),
        other => panic!("expected InvalidProfile, found {other:?}"),
    }
}

#[rstest]
fn http_builder_reports_invalid_base_url() {
    let args = EstimateArgs {
        request_path: Some("request.json".into()),
        routing_base_url: Some("not a url".to_owned()),
        ..EstimateArgs::default()
    };
    let config = EstimateConfig::try_from(args).expect("config should build");

    let Err(err) = HttpRoutingClientBuilder.build(&config) else {
        panic!("invalid base URL should not build a client");
    };
    match err {
        CliError::BuildRoutingClient { base_url, .. } => assert_eq!(base_url, "not a url"),
        other => panic!("expected BuildRoutingClient, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "max_attempts": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "request_path": "from-file.json",
            "routing_backend": "osrm",
            "profile": "walking",
            "max_attempts": 2,
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": "from-env.json",
        "profile": "cycling",
    }));
    composer.push_cli(json!({ "max_attempts": 5 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, "from-env.json");
    assert_eq!(config.backend, RoutingBackend::Osrm);
    assert_eq!(config.http.base_url, OSRM_DEMO_URL);
    assert_eq!(config.estimator.profile, TravelProfile::Cycling);
    assert_eq!(config.estimator.retry.max_attempts, 5);
}

#[rstest]
fn estimate_prices_every_driver(ten_minute_legs: StubBuilder) {
    let dir = RequestDir::with_request(&sample_request(2));

    let output = run_with(args_for(&dir), &ten_minute_legs).expect("estimate should succeed");
    let enriched: Vec<EnrichedMarker> =
        serde_json::from_value(output).expect("output should list enriched markers");

    let ids: Vec<u64> = enriched.iter().map(|item| item.marker.driver_id()).collect();
    assert_eq!(ids, vec![1, 2]);
    for item in &enriched {
        assert_eq!(item.estimated_minutes, 20.0);
        assert_eq!(item.price, "10.00");
    }
    assert_eq!(ten_minute_legs.client.calls(), 4);
}

#[rstest]
fn estimate_passes_profile_to_client(ten_minute_legs: StubBuilder) {
    let dir = RequestDir::with_request(&sample_request(1));
    let args = EstimateArgs {
        profile: Some("walking".to_owned()),
        ..args_for(&dir)
    };

    run_with(args, &ten_minute_legs).expect("estimate should succeed");
    assert_eq!(
        ten_minute_legs.client.profiles(),
        vec![TravelProfile::Walking, TravelProfile::Walking]
    );
}

#[rstest]
fn estimate_without_destination_fails_before_routing(ten_minute_legs: StubBuilder) {
    let request = RideRequest {
        destination: None,
        ..sample_request(2)
    };
    let dir = RequestDir::with_request(&request);

    let err = run_with(args_for(&dir), &ten_minute_legs).expect_err("missing destination");
    match err {
        CliError::Estimate(EstimationError::MissingLocation) => {}
        other => panic!("expected MissingLocation, found {other:?}"),
    }
    assert_eq!(ten_minute_legs.client.calls(), 0);
}

fn rejecting_dropoff() -> StubBuilder {
    let error = RoutingError::ServiceError {
        code: "2010".to_owned(),
        message: "no routable point".to_owned(),
    };
    StubBuilder {
        client: Arc::new(StubRoutingClient::new(600.0).fail_from(point(RIDER), error)),
    }
}

#[rstest]
fn estimate_fails_whole_batch_on_driver_error() {
    let dir = RequestDir::with_request(&sample_request(2));

    let err = run_with(args_for(&dir), &rejecting_dropoff()).expect_err("routing failure");
    match err {
        CliError::Estimate(EstimationError::Transport { leg, source, .. }) => {
            assert_eq!(leg, Leg::ToDestination);
            assert!(!source.is_transient());
        }
        other => panic!("expected Transport, found {other:?}"),
    }
}

#[rstest]
fn partial_estimate_reports_each_driver() {
    let dir = RequestDir::with_request(&sample_request(2));
    let args = EstimateArgs {
        partial: Some(true),
        ..args_for(&dir)
    };

    let output = run_with(args, &rejecting_dropoff()).expect("partial estimate should succeed");
    let entries = output.as_array().expect("partial output should be an array");
    assert_eq!(entries.len(), 2);
    for (entry, id) in entries.iter().zip(1_u64..) {
        assert_eq!(entry.get("status"), Some(&Value::from("failed")));
        assert_eq!(entry.get("driver_id"), Some(&Value::from(id)));
        let message = entry
            .get("error")
            .and_then(Value::as_str)
            .expect("failed entry should carry an error");
        assert!(message.contains("no routable point"), "message: {message}");
    }
}

#[rstest]
fn partial_estimate_flattens_successful_markers(ten_minute_legs: StubBuilder) {
    let dir = RequestDir::with_request(&sample_request(1));
    let args = EstimateArgs {
        partial: Some(true),
        ..args_for(&dir)
    };

    let output = run_with(args, &ten_minute_legs).expect("partial estimate should succeed");
    let entry = output
        .as_array()
        .and_then(|entries| entries.first())
        .expect("one entry");
    assert_eq!(entry.get("status"), Some(&Value::from("estimated")));
    assert_eq!(entry.get("price"), Some(&Value::from("10.00")));
    assert_eq!(entry.get("title"), Some(&Value::from("Driver 1")));
}
