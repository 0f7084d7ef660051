use axum::{extract::State, Json};

use super::extract::{ApiJson, ApiPath};
use crate::error::Result;
use crate::models::{SaveViewportInput, ViewportState};
use crate::AppState;

/// PUT /api/viewport
pub async fn save_viewport(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveViewportInput>,
) -> Result<Json<ViewportState>> {
    let viewport = state.viewports.save_viewport(payload).await?;
    Ok(Json(viewport))
}

/// GET /api/viewport/:user_id
///
/// Responds `null` when the user never saved a viewport.
pub async fn get_viewport(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Option<ViewportState>>> {
    let viewport = state.viewports.get_viewport(user_id).await?;
    Ok(Json(viewport))
}
