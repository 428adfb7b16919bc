//! Integration tests for the routing adapter using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use placebot_routing::{Coordinates, RoutingClient, RoutingError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn origin() -> Coordinates {
    Coordinates::new(59.9343, 30.3351)
}

fn destination() -> Coordinates {
    Coordinates::new(59.9398, 30.3146)
}

#[tokio::test]
async fn test_route_success() {
    let mock_server = MockServer::start().await;

    // OSRM takes lon,lat pairs in the path
    Mock::given(method("GET"))
        .and(path("/route/v1/driving/30.3351,59.9343;30.3146,59.9398"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "Ok",
            "routes": [
                {"distance": 2140.5, "duration": 480.0}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = RoutingClient::new(&mock_server.uri()).unwrap();
    let summary = client
        .route(origin(), destination(), Some("Palace Square, 2"))
        .await
        .unwrap();

    assert_eq!(summary.distance_meters, 2140.5);
    assert_eq!(summary.duration_minutes(), 8);
    assert!(summary.map_url.contains("Palace%20Square"));
}

#[tokio::test]
async fn test_route_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "NoRoute",
            "routes": []
        })))
        .mount(&mock_server)
        .await;

    let client = RoutingClient::new(&mock_server.uri()).unwrap();
    let result = client.route(origin(), destination(), None).await;

    assert!(matches!(result, Err(RoutingError::NoRoute)));
}

#[tokio::test]
async fn test_route_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = RoutingClient::new(&mock_server.uri()).unwrap();
    let result = client.route(origin(), destination(), None).await;

    match result {
        Err(RoutingError::Api { status }) => assert_eq!(status, 503),
        other => panic!("expected Api error, got {:?}", other),
    }
}
