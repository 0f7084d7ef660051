//! NominatimGeocoder against a local stub provider

mod common;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{paris_records, spawn_server};
use mapmark::models::SearchQuery;
use mapmark::places::{Geocoder, NominatimGeocoder, PlaceLookup};
use mapmark::AppError;

type Seen = Arc<Mutex<Vec<(HashMap<String, String>, Option<String>)>>>;

/// Stub answering `/search` with `body`, recording params and User-Agent
async fn stub_provider(status: StatusCode, body: Value) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().route(
        "/search",
        get(
            move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| {
                let recorder = recorder.clone();
                let body = body.clone();
                async move {
                    let agent = headers
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorder.lock().unwrap().push((params, agent));
                    (status, Json(body))
                }
            },
        ),
    );

    let base_url = spawn_server(app).await;
    (format!("{}/search", base_url), seen)
}

fn geocoder(endpoint: String) -> NominatimGeocoder {
    NominatimGeocoder::new(endpoint, "mapmark-tests/1.0", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_lookup_sends_provider_parameters() {
    let (endpoint, seen) = stub_provider(StatusCode::OK, paris_records()).await;

    let records = geocoder(endpoint).lookup("Paris", 7).await.unwrap();
    assert_eq!(records.len(), 2);

    let seen = seen.lock().unwrap();
    let (params, agent) = &seen[0];
    assert_eq!(params["q"], "Paris");
    assert_eq!(params["format"], "json");
    assert_eq!(params["addressdetails"], "1");
    assert_eq!(params["limit"], "7");
    assert_eq!(params["accept-language"], "en");
    assert_eq!(agent.as_deref(), Some("mapmark-tests/1.0"));
}

#[tokio::test]
async fn test_lookup_non_success_status_is_provider_error() {
    let (endpoint, _) = stub_provider(StatusCode::TOO_MANY_REQUESTS, json!([])).await;

    let err = geocoder(endpoint).lookup("Paris", 5).await.unwrap_err();
    assert!(matches!(err, AppError::Provider(ref msg) if msg.contains("429")));
}

#[tokio::test]
async fn test_lookup_non_array_body_is_provider_error() {
    let (endpoint, _) = stub_provider(StatusCode::OK, json!({ "error": "nope" })).await;

    let err = geocoder(endpoint).lookup("Paris", 5).await.unwrap_err();
    assert!(matches!(err, AppError::Provider(_)));
}

#[tokio::test]
async fn test_place_lookup_end_to_end() {
    let (endpoint, seen) = stub_provider(StatusCode::OK, paris_records()).await;
    let lookup = PlaceLookup::new(Arc::new(geocoder(endpoint)));

    let results = lookup
        .search(SearchQuery::new("Paris", None))
        .await
        .unwrap();
    assert_eq!(results[0].place_id, "12345");
    assert_eq!(results[1].place_id, "7444");
    assert_eq!(seen.lock().unwrap()[0].0["limit"], "10");

    // Empty queries never reach the provider
    let err = lookup.search(SearchQuery::new("", None)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_zero_matches_is_empty() {
    let (endpoint, _) = stub_provider(StatusCode::OK, json!([])).await;
    let lookup = PlaceLookup::new(Arc::new(geocoder(endpoint)));

    let results = lookup
        .search(SearchQuery::new("nowhere-at-all", Some(3)))
        .await
        .unwrap();
    assert!(results.is_empty());
}
