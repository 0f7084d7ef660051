use axum::{extract::State, Json};

use super::extract::ApiQuery;
use crate::error::Result;
use crate::models::{SearchQuery, SearchResult};
use crate::AppState;

/// GET /api/search?query=&limit=
pub async fn search_places(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>> {
    let results = state.places.search(params).await?;
    Ok(Json(results))
}
