use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::ClientError;
use crate::models::{
    AnnotationFilter, AnnotationQuery, CreateMarkerInput, CreateShapeInput, Marker,
    SaveViewportInput, SearchQuery, SearchResult, Shape, UpdateMarkerInput, UpdateShapeInput,
    ViewportState,
};

/// Body of a successful `/health` probe
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// Remote operations the resilient session depends on
#[async_trait]
pub trait SyncApi: Send + Sync {
    async fn healthcheck(&self) -> Result<HealthStatus, ClientError>;

    async fn create_marker(&self, input: &CreateMarkerInput) -> Result<Marker, ClientError>;
    async fn list_markers(&self, filter: &AnnotationFilter) -> Result<Vec<Marker>, ClientError>;
    async fn update_marker(&self, input: &UpdateMarkerInput) -> Result<Marker, ClientError>;
    async fn delete_marker(&self, id: i64) -> Result<bool, ClientError>;

    async fn create_shape(&self, input: &CreateShapeInput) -> Result<Shape, ClientError>;
    async fn list_shapes(&self, filter: &AnnotationFilter) -> Result<Vec<Shape>, ClientError>;
    async fn update_shape(&self, input: &UpdateShapeInput) -> Result<Shape, ClientError>;
    async fn delete_shape(&self, id: i64) -> Result<bool, ClientError>;

    async fn save_viewport(&self, input: &SaveViewportInput) -> Result<ViewportState, ClientError>;
    async fn get_viewport(&self, user_id: i64) -> Result<Option<ViewportState>, ClientError>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ClientError>;
}

/// [`SyncApi`] over the JSON HTTP routes
#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    client: Client,
    base_url: String,
}

impl HttpSyncClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        // Prefer the `{"error": ...}` message over the bare status text
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.to_string());

        if status.is_client_error() {
            Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            })
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl SyncApi for HttpSyncClient {
    async fn healthcheck(&self) -> Result<HealthStatus, ClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    async fn create_marker(&self, input: &CreateMarkerInput) -> Result<Marker, ClientError> {
        self.send(self.client.post(self.url("/api/markers")).json(input))
            .await
    }

    async fn list_markers(&self, filter: &AnnotationFilter) -> Result<Vec<Marker>, ClientError> {
        let query = AnnotationQuery::from(*filter);
        self.send(self.client.get(self.url("/api/markers")).query(&query))
            .await
    }

    async fn update_marker(&self, input: &UpdateMarkerInput) -> Result<Marker, ClientError> {
        let url = self.url(&format!("/api/markers/{}", input.id));
        self.send(self.client.patch(url).json(input)).await
    }

    async fn delete_marker(&self, id: i64) -> Result<bool, ClientError> {
        let url = self.url(&format!("/api/markers/{}", id));
        self.send(self.client.delete(url)).await
    }

    async fn create_shape(&self, input: &CreateShapeInput) -> Result<Shape, ClientError> {
        self.send(self.client.post(self.url("/api/shapes")).json(input))
            .await
    }

    async fn list_shapes(&self, filter: &AnnotationFilter) -> Result<Vec<Shape>, ClientError> {
        let query = AnnotationQuery::from(*filter);
        self.send(self.client.get(self.url("/api/shapes")).query(&query))
            .await
    }

    async fn update_shape(&self, input: &UpdateShapeInput) -> Result<Shape, ClientError> {
        let url = self.url(&format!("/api/shapes/{}", input.id));
        self.send(self.client.patch(url).json(input)).await
    }

    async fn delete_shape(&self, id: i64) -> Result<bool, ClientError> {
        let url = self.url(&format!("/api/shapes/{}", id));
        self.send(self.client.delete(url)).await
    }

    async fn save_viewport(&self, input: &SaveViewportInput) -> Result<ViewportState, ClientError> {
        self.send(self.client.put(self.url("/api/viewport")).json(input))
            .await
    }

    async fn get_viewport(&self, user_id: i64) -> Result<Option<ViewportState>, ClientError> {
        let url = self.url(&format!("/api/viewport/{}", user_id));
        self.send(self.client.get(url)).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, ClientError> {
        self.send(self.client.get(self.url("/api/search")).query(query))
            .await
    }
}
