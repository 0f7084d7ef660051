//! Free-text place lookup through an external geocoding provider.

pub mod nominatim;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::constants::UNKNOWN_PLACE_ID;
use crate::error::{AppError, Result};
use crate::models::{SearchQuery, SearchResult};

pub use nominatim::NominatimGeocoder;

/// Raw provider record. Numeric fields usually arrive as text.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRecord {
    #[serde(default)]
    pub place_id: Option<Value>,
    #[serde(default)]
    pub osm_id: Option<Value>,
    pub display_name: String,
    pub lat: Value,
    pub lon: Value,
    #[serde(default)]
    pub address: Option<Map<String, Value>>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub importance: Option<Value>,
}

impl ProviderRecord {
    /// Normalize into a [`SearchResult`].
    ///
    /// A missing identifier falls back to `osm_id`, then `"unknown"`. A numeric
    /// field that does not parse is a provider error, never a silent zero.
    pub fn into_result(self) -> Result<SearchResult> {
        let place_id = identifier(self.place_id.as_ref())
            .or_else(|| identifier(self.osm_id.as_ref()))
            .unwrap_or_else(|| UNKNOWN_PLACE_ID.to_string());

        let latitude = number("lat", &self.lat)?;
        let longitude = number("lon", &self.lon)?;
        let importance = match &self.importance {
            Some(value) => Some(number("importance", value)?),
            None => None,
        };

        let address = match self.address {
            Some(address) => Some(
                serde_json::to_string(&address)
                    .map_err(|e| AppError::provider(format!("Unencodable address: {}", e)))?,
            ),
            None => None,
        };

        Ok(SearchResult {
            place_id,
            display_name: self.display_name,
            latitude,
            longitude,
            address,
            place_type: self.place_type.or(self.class),
            importance,
        })
    }
}

fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(field: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(AppError::provider(format!(
            "Non-numeric {} in provider response: {}",
            field, value
        ))),
    }
}

/// External free-text geocoding backend
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, query: &str, limit: u32) -> Result<Vec<ProviderRecord>>;
}

/// Validates lookups and normalizes provider output
#[derive(Clone)]
pub struct PlaceLookup {
    geocoder: Arc<dyn Geocoder>,
}

impl PlaceLookup {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Zero matches is `Ok(vec![])`
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<SearchResult>> {
        let limit = query.validate()?;

        let records = self.geocoder.lookup(&query.query, limit).await?;
        let results = records
            .into_iter()
            .map(ProviderRecord::into_result)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(query = %query.query, hits = results.len(), "Place lookup");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedGeocoder {
        body: Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for CannedGeocoder {
        async fn lookup(&self, _query: &str, limit: u32) -> Result<Vec<ProviderRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut records: Vec<ProviderRecord> =
                serde_json::from_value(self.body.clone()).unwrap();
            records.truncate(limit as usize);
            Ok(records)
        }
    }

    fn lookup(body: Value) -> (PlaceLookup, Arc<CannedGeocoder>) {
        let geocoder = Arc::new(CannedGeocoder {
            body,
            calls: AtomicUsize::new(0),
        });
        (PlaceLookup::new(geocoder.clone()), geocoder)
    }

    fn record(value: Value) -> ProviderRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_maps_full_record() {
        let result = record(json!({
            "place_id": 12345,
            "osm_id": 999,
            "display_name": "Paris, France",
            "lat": "48.8566",
            "lon": "2.3522",
            "address": { "city": "Paris", "country": "France" },
            "type": "city",
            "class": "place",
            "importance": "0.95"
        }))
        .into_result()
        .unwrap();

        assert_eq!(result.place_id, "12345");
        assert_eq!(result.latitude, 48.8566);
        assert_eq!(result.longitude, 2.3522);
        assert_eq!(result.place_type.as_deref(), Some("city"));
        assert_eq!(result.importance, Some(0.95));

        let address: Value = serde_json::from_str(result.address.as_deref().unwrap()).unwrap();
        assert_eq!(address["city"], "Paris");
    }

    #[test]
    fn test_identifier_fallbacks() {
        let by_osm = record(json!({
            "osm_id": "relation/7444",
            "display_name": "x",
            "lat": "1",
            "lon": "2"
        }))
        .into_result()
        .unwrap();
        assert_eq!(by_osm.place_id, "relation/7444");

        let unknown = record(json!({
            "display_name": "x",
            "lat": "1",
            "lon": "2",
            "class": "highway"
        }))
        .into_result()
        .unwrap();
        assert_eq!(unknown.place_id, "unknown");
        assert_eq!(unknown.place_type.as_deref(), Some("highway"));
        assert_eq!(unknown.address, None);
        assert_eq!(unknown.importance, None);
    }

    #[test]
    fn test_non_numeric_field_is_provider_error() {
        let err = record(json!({
            "place_id": "1",
            "display_name": "x",
            "lat": "north-ish",
            "lon": "2"
        }))
        .into_result()
        .unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));

        let err = record(json!({
            "display_name": "x",
            "lat": "1",
            "lon": "2",
            "importance": "high"
        }))
        .into_result()
        .unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn test_empty_query_never_reaches_provider() {
        let (lookup, geocoder) = lookup(json!([]));

        let err = lookup.search(SearchQuery::new("", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_matches_is_ok() {
        let (lookup, geocoder) = lookup(json!([]));

        let results = lookup
            .search(SearchQuery::new("nowhere", None))
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_limit_is_passed_through() {
        let (lookup, _) = lookup(json!([
            { "place_id": "1", "display_name": "a", "lat": "1", "lon": "1" },
            { "place_id": "2", "display_name": "b", "lat": "2", "lon": "2" },
            { "place_id": "3", "display_name": "c", "lat": "3", "lon": "3" }
        ]));

        let results = lookup
            .search(SearchQuery::new("abc", Some(2)))
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.place_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
