use axum::{extract::State, Json};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::Result;
use crate::models::{AnnotationFilter, AnnotationQuery, CreateShapeInput, Shape, UpdateShapeInput};
use crate::AppState;

/// POST /api/shapes
pub async fn create_shape(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateShapeInput>,
) -> Result<Json<Shape>> {
    let shape = state.annotations.create_shape(payload).await?;
    Ok(Json(shape))
}

/// GET /api/shapes?user_id=&north=&south=&east=&west=
///
/// Newest first. The bounding box is validated but does not filter shapes:
/// geometry is stored as opaque text.
pub async fn list_shapes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AnnotationQuery>,
) -> Result<Json<Vec<Shape>>> {
    let filter = AnnotationFilter::try_from(params)?;
    let shapes = state.annotations.list_shapes(filter).await?;
    Ok(Json(shapes))
}

/// PATCH /api/shapes/:id
pub async fn update_shape(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut payload): ApiJson<UpdateShapeInput>,
) -> Result<Json<Shape>> {
    payload.id = id;
    let shape = state.annotations.update_shape(payload).await?;
    Ok(Json(shape))
}

/// DELETE /api/shapes/:id
pub async fn delete_shape(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<bool>> {
    let deleted = state.annotations.delete_shape(id).await?;
    Ok(Json(deleted))
}
