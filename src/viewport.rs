//! Per-user last viewed map position.

use crate::db::Db;
use crate::error::Result;
use crate::models::{SaveViewportInput, ViewportState};

/// One viewport row per user, written by idempotent upsert
#[derive(Clone)]
pub struct ViewportManager {
    db: Db,
}

impl ViewportManager {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert or overwrite the user's viewport. `id` and `created_at` stay
    /// stable across saves.
    pub async fn save_viewport(&self, input: SaveViewportInput) -> Result<ViewportState> {
        input.validate()?;

        let state = self.db.upsert_viewport(&input).await?;
        tracing::debug!(
            user_id = state.user_id,
            zoom = state.zoom_level,
            "Viewport saved"
        );
        Ok(state)
    }

    /// `None` if the user never saved a viewport
    pub async fn get_viewport(&self, user_id: i64) -> Result<Option<ViewportState>> {
        self.db.get_viewport(user_id).await
    }
}
