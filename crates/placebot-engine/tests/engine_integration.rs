//! End-to-end dispatch tests with mock upstream providers.
//!
//! Providers are wiremock servers, storage is in-memory SQLite, so every
//! test exercises the real resolve -> aggregate -> reply pipeline.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use placebot_catalog::{Place, PlaceCatalog};
use placebot_engine::{CommandKind, Engine, EngineError, EngineSettings, IncomingCommand};
use placebot_routing::{Coordinates, RoutingClient};
use placebot_store::{FeedbackClient, SqliteFeedbackStore};
use placebot_weather::{Geocoder, WeatherProvider};

fn place(id: &str, name: &str, address: Option<&str>) -> Place {
    Place {
        id: id.to_string(),
        name: name.to_string(),
        latitude: 59.94,
        longitude: 30.31,
        address: address.map(str::to_string),
        hours: None,
        website: None,
    }
}

fn test_catalog() -> Arc<PlaceCatalog> {
    Arc::new(
        PlaceCatalog::from_places(vec![
            place("12", "Central Park", Some("Park Lane, 1")),
            place("1", "Hermitage Museum", Some("Palace Square, 2")),
            place("2", "Russian Museum", None),
        ])
        .unwrap(),
    )
}

struct TestContext {
    engine: Engine,
    store: FeedbackClient,
}

fn build_engine(weather_uri: &str, geocode_uri: &str, routing_uri: &str) -> TestContext {
    let store = FeedbackClient::new(SqliteFeedbackStore::in_memory().unwrap());
    let engine = Engine::new(
        test_catalog(),
        WeatherProvider::new(weather_uri).unwrap(),
        Geocoder::new(geocode_uri).unwrap(),
        RoutingClient::new(routing_uri).unwrap(),
        store.clone(),
        EngineSettings {
            origin: Coordinates::new(59.9343, 30.3351),
            origin_label: "City center".to_string(),
            call_timeout: Duration::from_secs(5),
        },
    );
    TestContext { engine, store }
}

fn cmd(command: CommandKind, args: &str) -> IncomingCommand {
    IncomingCommand::new(command, args, "user-1", false)
}

fn weather_body() -> serde_json::Value {
    serde_json::json!({
        "current": {
            "temperature_2m": 3.4,
            "weather_code": 61
        }
    })
}

fn route_body() -> serde_json::Value {
    serde_json::json!({
        "code": "Ok",
        "routes": [
            {"distance": 2000.0, "duration": 600.0}
        ]
    })
}

async fn mock_ok(server: &MockServer, url_path: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_find_exact_name_resolves_uniquely() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::Find, "Central Park")).await.unwrap();

    assert!(reply.text.contains("Central Park (id 12)"));
    assert!(reply.suggestions.is_empty());
}

#[tokio::test]
async fn test_find_ambiguous_makes_no_provider_calls() {
    let weather_server = MockServer::start().await;
    let routing_server = MockServer::start().await;

    // Any provider traffic fails the test when the servers verify on drop
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&routing_server)
        .await;

    let ctx = build_engine(&weather_server.uri(), &weather_server.uri(), &routing_server.uri());

    let reply = ctx.engine.handle(&cmd(CommandKind::Plan, "museum")).await.unwrap();

    assert_eq!(reply.suggestions.len(), 2);
    assert_eq!(reply.suggestions[0].id, "1");
    assert!(reply.weather.is_none());
    assert!(reply.route.is_none());
}

#[tokio::test]
async fn test_find_not_found() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::Find, "atlantis")).await.unwrap();

    assert!(reply.text.contains("Could not find a place"));
    assert!(reply.suggestions.is_empty());
}

#[tokio::test]
async fn test_route_by_id_returns_summary() {
    let routing_server = MockServer::start().await;
    mock_ok(
        &routing_server,
        "/route/v1/driving/30.3351,59.9343;30.31,59.94",
        route_body(),
    )
    .await;

    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", &routing_server.uri());

    let reply = ctx.engine.handle(&cmd(CommandKind::Route, "12")).await.unwrap();

    let route = reply.route.expect("route data expected");
    assert_eq!(route.distance_meters, 2000.0);
    assert!(reply.text.contains("2.0 km"));
    assert!(reply.text.contains("Central Park"));
}

#[tokio::test]
async fn test_plan_merges_weather_and_route() {
    let weather_server = MockServer::start().await;
    let routing_server = MockServer::start().await;
    mock_ok(&weather_server, "/v1/forecast", weather_body()).await;
    mock_ok(
        &routing_server,
        "/route/v1/driving/30.3351,59.9343;30.31,59.94",
        route_body(),
    )
    .await;

    let ctx = build_engine(&weather_server.uri(), &weather_server.uri(), &routing_server.uri());

    let reply = ctx.engine.handle(&cmd(CommandKind::Plan, "central")).await.unwrap();

    assert!(reply.weather.is_some());
    assert!(reply.route.is_some());
    assert!(reply.text.contains("Plan for Central Park"));
    assert!(reply.text.contains("+3.4 C, Rain"));
    assert!(reply.text.contains("about 10 min"));

    let counts = ctx.store.usage_counts().await.unwrap();
    assert!(counts.contains(&("plan".to_string(), 1)));
}

#[tokio::test]
async fn test_plan_weather_failure_degrades_to_partial_reply() {
    let weather_server = MockServer::start().await;
    let routing_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&weather_server)
        .await;
    mock_ok(
        &routing_server,
        "/route/v1/driving/30.3351,59.9343;30.31,59.94",
        route_body(),
    )
    .await;

    let ctx = build_engine(&weather_server.uri(), &weather_server.uri(), &routing_server.uri());

    let reply = ctx.engine.handle(&cmd(CommandKind::Plan, "central")).await.unwrap();

    assert!(reply.weather.is_none());
    assert!(reply.route.is_some());
    assert!(reply.text.contains("Weather is unavailable right now."));
    assert!(reply.text.contains("Open the map:"));
}

#[tokio::test]
async fn test_plan_both_providers_down_fails_command() {
    let weather_server = MockServer::start().await;
    let routing_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&weather_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&routing_server)
        .await;

    let ctx = build_engine(&weather_server.uri(), &weather_server.uri(), &routing_server.uri());

    let result = ctx.engine.handle(&cmd(CommandKind::Plan, "central")).await;
    assert!(matches!(result, Err(EngineError::CommandFailed)));

    // Failed commands are not counted
    let counts = ctx.store.usage_counts().await.unwrap();
    assert!(!counts.iter().any(|(name, _)| name == "plan"));
}

#[tokio::test]
async fn test_plan_timeout_counts_as_provider_failure() {
    let weather_server = MockServer::start().await;
    let routing_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(weather_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&weather_server)
        .await;
    mock_ok(
        &routing_server,
        "/route/v1/driving/30.3351,59.9343;30.31,59.94",
        route_body(),
    )
    .await;

    let store = FeedbackClient::new(SqliteFeedbackStore::in_memory().unwrap());
    let engine = Engine::new(
        test_catalog(),
        WeatherProvider::new(&weather_server.uri()).unwrap(),
        Geocoder::new(&weather_server.uri()).unwrap(),
        RoutingClient::new(&routing_server.uri()).unwrap(),
        store,
        EngineSettings {
            origin: Coordinates::new(59.9343, 30.3351),
            origin_label: "City center".to_string(),
            call_timeout: Duration::from_secs(1),
        },
    );

    let reply = engine.handle(&cmd(CommandKind::Plan, "central")).await.unwrap();

    assert!(reply.weather.is_none());
    assert!(reply.route.is_some());
    assert!(reply.text.contains("Weather is unavailable right now."));
}

#[tokio::test]
async fn test_weather_for_named_city() {
    let weather_server = MockServer::start().await;
    let geocode_server = MockServer::start().await;
    mock_ok(&weather_server, "/v1/forecast", weather_body()).await;
    mock_ok(
        &geocode_server,
        "/v1/search",
        serde_json::json!({
            "results": [
                {"name": "Helsinki", "latitude": 60.17, "longitude": 24.94}
            ]
        }),
    )
    .await;

    let ctx = build_engine(&weather_server.uri(), &geocode_server.uri(), "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::Weather, "Helsinki")).await.unwrap();

    assert!(reply.text.contains("Weather in Helsinki"));
    assert!(reply.weather.is_some());
}

#[tokio::test]
async fn test_weather_unknown_city_is_plain_reply() {
    let geocode_server = MockServer::start().await;
    mock_ok(&geocode_server, "/v1/search", serde_json::json!({"results": []})).await;

    let ctx = build_engine("http://127.0.0.1:9", &geocode_server.uri(), "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::Weather, "Atlantis")).await.unwrap();

    assert!(reply.text.contains("Could not find a city named \"Atlantis\""));
    assert!(reply.weather.is_none());
}

#[tokio::test]
async fn test_feedback_recorded() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    let reply = ctx
        .engine
        .handle(&cmd(CommandKind::Feedback, "more parks please"))
        .await
        .unwrap();

    assert!(reply.text.contains("Thank you"));
    assert_eq!(ctx.store.feedback_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_feedback_without_text_prompts_usage() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::Feedback, "  ")).await.unwrap();

    assert!(reply.text.contains("/feedback"));
    assert_eq!(ctx.store.feedback_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_stats_denied_for_non_admin() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    // Seed the store so the denial clearly ignores its contents
    ctx.engine.handle(&cmd(CommandKind::Ping, "")).await.unwrap();
    ctx.engine
        .handle(&cmd(CommandKind::Feedback, "hello"))
        .await
        .unwrap();

    let result = ctx.engine.handle(&cmd(CommandKind::Stats, "")).await;
    assert!(matches!(result, Err(EngineError::Unauthorized)));
}

#[tokio::test]
async fn test_stats_for_admin_reports_counts() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    ctx.engine.handle(&cmd(CommandKind::Find, "Central Park")).await.unwrap();
    ctx.engine.handle(&cmd(CommandKind::Find, "Hermitage Museum")).await.unwrap();
    ctx.engine
        .handle(&cmd(CommandKind::Feedback, "nice bot"))
        .await
        .unwrap();

    let admin = IncomingCommand::new(CommandKind::Stats, "", "admin-1", true);
    let reply = ctx.engine.handle(&admin).await.unwrap();

    assert!(reply.text.contains("/find: 2"));
    assert!(reply.text.contains("/feedback: 1"));
    assert!(reply.text.contains("Feedback entries: 1"));
}

#[tokio::test]
async fn test_list_shows_catalog_in_order() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::List, "")).await.unwrap();

    let park = reply.text.find("12. Central Park").unwrap();
    let hermitage = reply.text.find("1. Hermitage Museum").unwrap();
    assert!(park < hermitage);
}

#[tokio::test]
async fn test_help_lists_commands() {
    let ctx = build_engine("http://127.0.0.1:9", "http://127.0.0.1:9", "http://127.0.0.1:9");

    let reply = ctx.engine.handle(&cmd(CommandKind::Help, "")).await.unwrap();
    for command in ["/find", "/route", "/plan", "/feedback"] {
        assert!(reply.text.contains(command), "help should mention {}", command);
    }
}
