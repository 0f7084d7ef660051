use axum::{extract::State, Json};

use super::extract::{ApiJson, ApiPath};
use crate::error::Result;
use crate::models::{CreateUserInput, UpdateUserInput, User};
use crate::AppState;

/// POST /api/users
///
/// Returns 409 Conflict if the username or email is taken.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserInput>,
) -> Result<Json<User>> {
    let user = state.users.create_user(payload).await?;
    Ok(Json(user))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Option<User>>> {
    let user = state.users.get_user(id).await?;
    Ok(Json(user))
}

/// PATCH /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut payload): ApiJson<UpdateUserInput>,
) -> Result<Json<User>> {
    payload.id = id;
    let user = state.users.update_user(payload).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
///
/// Permanently deletes the user and all of their markers, shapes and viewport.
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<bool>> {
    let deleted = state.users.delete_user(id).await?;
    Ok(Json(deleted))
}
