//! Shared helpers for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;

use mapmark::config::StorageBackend;
use mapmark::db::MemoryRepository;
use mapmark::places::{Geocoder, ProviderRecord};
use mapmark::{router, AppError, AppState, Config};

/// Create a test configuration
pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0, // Random port
        storage_backend: StorageBackend::Memory,
        database_url: None,
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
        geocoder_url: "http://127.0.0.1:9/search".to_string(),
        geocoder_user_agent: "mapmark-tests".to_string(),
        geocoder_timeout_secs: 5,
        seed_demo_user: true,
    }
}

/// Geocoder answering every lookup with the same records
pub struct StaticGeocoder {
    pub records: Value,
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn lookup(&self, _query: &str, limit: u32) -> mapmark::Result<Vec<ProviderRecord>> {
        let mut records: Vec<ProviderRecord> =
            serde_json::from_value(self.records.clone()).unwrap();
        records.truncate(limit as usize);
        Ok(records)
    }
}

/// Geocoder whose provider is always down
pub struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn lookup(&self, _query: &str, _limit: u32) -> mapmark::Result<Vec<ProviderRecord>> {
        Err(AppError::provider(
            "Geocoding API failed: 503 Service Unavailable",
        ))
    }
}

pub fn paris_records() -> Value {
    json!([
        {
            "place_id": 12345,
            "display_name": "Paris, Île-de-France, France",
            "lat": "48.8566",
            "lon": "2.3522",
            "address": { "city": "Paris", "country": "France" },
            "type": "city",
            "importance": 0.95
        },
        {
            "osm_id": 7444,
            "display_name": "Paris, Texas, United States",
            "lat": "33.6609",
            "lon": "-95.5555",
            "class": "place"
        }
    ])
}

/// Memory-backed state with the demo user seeded
pub async fn memory_state_with(geocoder: Arc<dyn Geocoder>) -> AppState {
    let state = AppState::new(Arc::new(MemoryRepository::new()), geocoder, test_config());
    state.users.seed_demo_user().await.unwrap();
    state
}

pub async fn memory_state() -> AppState {
    memory_state_with(Arc::new(StaticGeocoder {
        records: paris_records(),
    }))
    .await
}

/// Create a test app router
pub async fn create_test_app() -> Router {
    router(memory_state().await)
}

/// Serve `app` on an ephemeral port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Parse response body as JSON
pub async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a request with a JSON body
pub fn make_json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Create a request without a body
pub fn make_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request through a fresh clone of `app`
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    use tower::ServiceExt;

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = body_to_json(response.into_body()).await;
    (status, body)
}
