use httpmock::prelude::*;
use axum::http::StatusCode;
use pharmacy_api::AppError;
use pharmacy_api::infrastructure::geocoding::{
    GeoPoint, Geocoder, GeocodingError, GoogleMapsClient,
};
use serde_json::json;
use std::time::Duration;

const API_KEY: &str = "test-key";

fn client(server: &MockServer) -> GoogleMapsClient {
    GoogleMapsClient::new(&server.base_url(), API_KEY, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_geocode_returns_first_result() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/geocode/json")
                .query_param("address", "Alexanderplatz 1, Berlin")
                .query_param("key", API_KEY);
            then.status(200).json_body(json!({
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "Alexanderplatz 1, 10178 Berlin, Germany",
                        "geometry": { "location": { "lat": 52.5219, "lng": 13.4132 } },
                        "place_id": "ChIJ-first"
                    },
                    {
                        "formatted_address": "Alexanderplatz, Berlin, Germany",
                        "geometry": { "location": { "lat": 52.52, "lng": 13.41 } },
                        "place_id": "ChIJ-second"
                    }
                ]
            }));
        })
        .await;

    let result = client(&server)
        .geocode("Alexanderplatz 1, Berlin")
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.location, GeoPoint::new(52.5219, 13.4132));
    assert_eq!(result.place_id.as_deref(), Some("ChIJ-first"));
}

#[tokio::test]
async fn test_geocode_zero_results_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(200)
                .json_body(json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;

    let result = client(&server).geocode("Nowhere 0").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_geocode_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(200).json_body(json!({
                "status": "REQUEST_DENIED",
                "results": [],
                "error_message": "The provided API key is invalid."
            }));
        })
        .await;

    let err = client(&server).geocode("Main St 1").await.unwrap_err();
    match err {
        GeocodingError::Status { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_geocode_http_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(500).body("upstream exploded");
        })
        .await;

    let err = client(&server).geocode("Main St 1").await.unwrap_err();
    assert!(matches!(err, GeocodingError::Http(_)));
}

#[tokio::test]
async fn test_http_failure_does_not_expose_api_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(500);
        })
        .await;

    let client =
        GoogleMapsClient::new(&server.base_url(), "SECRET-KEY-123", Duration::from_secs(5))
            .unwrap();
    let err = client.geocode("Main St 1").await.unwrap_err();
    assert!(!err.to_string().contains("SECRET-KEY-123"));

    let api_error = AppError::from(err);
    assert_eq!(api_error.status(), StatusCode::BAD_GATEWAY);

    let body = serde_json::to_string(&api_error.to_error_info()).unwrap();
    assert!(body.contains("upstream_error"));
    assert!(!body.contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn test_distance_matrix() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/distancematrix/json")
                .query_param("origins", "52.5,13.4")
                .query_param("destinations", "52.6,13.5|48.1,11.6")
                .query_param("key", API_KEY);
            then.status(200).json_body(json!({
                "status": "OK",
                "origin_addresses": ["Berlin"],
                "destination_addresses": ["Pankow", "Munich"],
                "rows": [{
                    "elements": [
                        {
                            "status": "OK",
                            "distance": { "text": "13.1 km", "value": 13100 },
                            "duration": { "text": "21 mins", "value": 1260 }
                        },
                        { "status": "ZERO_RESULTS" }
                    ]
                }]
            }));
        })
        .await;

    let matrix = client(&server)
        .distance_matrix(
            &[GeoPoint::new(52.5, 13.4)],
            &[GeoPoint::new(52.6, 13.5), GeoPoint::new(48.1, 11.6)],
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(matrix.destination_addresses, vec!["Pankow", "Munich"]);

    let near = matrix.element(0, 0).unwrap();
    assert!(near.is_ok());
    assert_eq!(near.distance_meters, Some(13100));
    assert_eq!(near.duration_seconds, Some(1260));

    let far = matrix.element(0, 1).unwrap();
    assert!(!far.is_ok());
    assert_eq!(far.distance_meters, None);
}

#[tokio::test]
async fn test_distance_matrix_with_no_points_skips_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/distancematrix/json");
            then.status(500);
        })
        .await;

    let matrix = client(&server)
        .distance_matrix(&[], &[GeoPoint::new(1.0, 1.0)])
        .await
        .unwrap();

    assert!(matrix.rows.is_empty());
    mock.assert_hits_async(0).await;
}
