//! Persistence backends.
//!
//! Handlers only see [`Repository`]; validation happens above it, so every
//! method here assumes well-formed input and reports storage outcomes only.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::{AppError, Result};
use crate::models::{
    AnnotationFilter, CreateMarkerInput, CreateShapeInput, CreateUserInput, Marker,
    SaveViewportInput, Shape, UpdateMarkerInput, UpdateShapeInput, UpdateUserInput, User,
    ViewportState,
};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Storage handle shared across handlers
pub type Db = Arc<dyn Repository>;

#[async_trait]
pub trait Repository: Send + Sync {
    /// Cheap liveness check used by the health endpoint
    async fn ping(&self) -> Result<()>;

    async fn user_exists(&self, id: i64) -> Result<bool>;
    async fn insert_user(&self, input: &CreateUserInput) -> Result<User>;
    /// Insert a user with a fixed id unless one already exists
    async fn ensure_user(&self, id: i64, username: &str, email: &str) -> Result<()>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn update_user(&self, input: &UpdateUserInput) -> Result<Option<User>>;
    /// Removes the user's markers, shapes and viewport as well
    async fn delete_user(&self, id: i64) -> Result<bool>;

    /// Fails with `ForeignKey` when the owner does not exist
    async fn insert_marker(&self, input: &CreateMarkerInput) -> Result<Marker>;
    async fn list_markers(&self, filter: &AnnotationFilter) -> Result<Vec<Marker>>;
    async fn update_marker(&self, input: &UpdateMarkerInput) -> Result<Option<Marker>>;
    async fn delete_marker(&self, id: i64) -> Result<bool>;

    async fn insert_shape(&self, input: &CreateShapeInput) -> Result<Shape>;
    /// Newest first. `bounds` in the filter is ignored.
    async fn list_shapes(&self, filter: &AnnotationFilter) -> Result<Vec<Shape>>;
    async fn update_shape(&self, input: &UpdateShapeInput) -> Result<Option<Shape>>;
    async fn delete_shape(&self, id: i64) -> Result<bool>;

    /// Insert-or-update keyed on `user_id`, atomic under the uniqueness constraint
    async fn upsert_viewport(&self, input: &SaveViewportInput) -> Result<ViewportState>;
    async fn get_viewport(&self, user_id: i64) -> Result<Option<ViewportState>>;
}

/// Open the configured backend, running migrations for Postgres
pub async fn open_repository(config: &Config) -> Result<Db> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                AppError::validation("DATABASE_URL is required for the postgres backend")
            })?;
            let repo = PgRepository::connect(url).await?;
            repo.migrate().await?;
            Ok(Arc::new(repo))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}
