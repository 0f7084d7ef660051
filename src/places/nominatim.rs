use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{Geocoder, ProviderRecord};
use crate::error::{AppError, Result};

/// Geocoder backed by a Nominatim-compatible `/search` endpoint
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    /// The provider's usage policy requires an identifying User-Agent
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, query: &str, limit: u32) -> Result<Vec<ProviderRecord>> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
                ("accept-language", "en"),
            ])
            .send()
            .await
            .map_err(|e| AppError::provider(format!("Geocoding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::provider(format!(
                "Geocoding API failed: {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::provider(format!("Unreadable geocoding response: {}", e)))?;

        if !body.is_array() {
            return Err(AppError::provider(
                "Invalid response format from geocoding API",
            ));
        }

        serde_json::from_value(body)
            .map_err(|e| AppError::provider(format!("Malformed geocoding record: {}", e)))
    }
}
