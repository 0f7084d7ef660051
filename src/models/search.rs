use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SEARCH_LIMIT, ERR_EMPTY_QUERY, ERR_SEARCH_LIMIT, MAX_SEARCH_LIMIT, MIN_SEARCH_LIMIT,
};
use crate::error::{AppError, Result};

/// Normalized place lookup hit. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub place_id: String,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub place_type: Option<String>,
    pub importance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, limit: Option<u32>) -> Self {
        Self {
            query: query.into(),
            limit,
        }
    }

    /// Check the query and return the effective limit
    pub fn validate(&self) -> Result<u32> {
        if self.query.trim().is_empty() {
            return Err(AppError::validation(ERR_EMPTY_QUERY));
        }

        let limit = self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(MIN_SEARCH_LIMIT..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(AppError::validation(ERR_SEARCH_LIMIT));
        }

        Ok(limit)
    }
}
