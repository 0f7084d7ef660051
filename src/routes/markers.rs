use axum::{extract::State, Json};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::Result;
use crate::models::{
    AnnotationFilter, AnnotationQuery, CreateMarkerInput, Marker, UpdateMarkerInput,
};
use crate::AppState;

/// POST /api/markers
pub async fn create_marker(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateMarkerInput>,
) -> Result<Json<Marker>> {
    let marker = state.annotations.create_marker(payload).await?;
    Ok(Json(marker))
}

/// GET /api/markers?user_id=&north=&south=&east=&west=
///
/// The four edges must be given together.
pub async fn list_markers(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AnnotationQuery>,
) -> Result<Json<Vec<Marker>>> {
    let filter = AnnotationFilter::try_from(params)?;
    let markers = state.annotations.list_markers(filter).await?;
    Ok(Json(markers))
}

/// PATCH /api/markers/:id
pub async fn update_marker(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut payload): ApiJson<UpdateMarkerInput>,
) -> Result<Json<Marker>> {
    payload.id = id;
    let marker = state.annotations.update_marker(payload).await?;
    Ok(Json(marker))
}

/// DELETE /api/markers/:id
pub async fn delete_marker(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<bool>> {
    let deleted = state.annotations.delete_marker(id).await?;
    Ok(Json(deleted))
}
