use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Repository;
use crate::constants::{DEFAULT_MARKER_COLOR, DEFAULT_SHAPE_STYLE};
use crate::error::{AppError, Result};
use crate::models::{
    AnnotationFilter, CreateMarkerInput, CreateShapeInput, CreateUserInput, Marker,
    SaveViewportInput, Shape, UpdateMarkerInput, UpdateShapeInput, UpdateUserInput, User,
    ViewportState,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    markers: BTreeMap<i64, Marker>,
    shapes: BTreeMap<i64, Shape>,
    /// Keyed by user id, which enforces one row per user
    viewports: BTreeMap<i64, ViewportState>,
    last_user_id: i64,
    last_marker_id: i64,
    last_shape_id: i64,
    last_viewport_id: i64,
}

impl Tables {
    fn check_unique_user(&self, id: Option<i64>, username: &str, email: &str) -> Result<()> {
        for user in self.users.values() {
            if Some(user.id) == id {
                continue;
            }
            if user.username == username {
                return Err(AppError::Conflict(format!(
                    "Username {} is already taken",
                    username
                )));
            }
            if user.email == email {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    email
                )));
            }
        }
        Ok(())
    }

    fn require_user(&self, user_id: i64) -> Result<()> {
        if !self.users.contains_key(&user_id) {
            return Err(AppError::ForeignKey(format!(
                "User with id {} does not exist",
                user_id
            )));
        }
        Ok(())
    }
}

/// In-process repository with the same constraints as the Postgres schema.
///
/// All state sits behind one mutex, so every operation is atomic.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn user_exists(&self, id: i64) -> Result<bool> {
        Ok(self.lock().users.contains_key(&id))
    }

    async fn insert_user(&self, input: &CreateUserInput) -> Result<User> {
        let mut tables = self.lock();
        tables.check_unique_user(None, &input.username, &input.email)?;

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            username: input.username.clone(),
            email: input.email.clone(),
            avatar_url: input.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn ensure_user(&self, id: i64, username: &str, email: &str) -> Result<()> {
        let mut tables = self.lock();
        // A clash on any unique column leaves the table untouched
        if tables.users.contains_key(&id)
            || tables.check_unique_user(None, username, email).is_err()
        {
            return Ok(());
        }

        let now = Utc::now();
        tables.users.insert(
            id,
            User {
                id,
                username: username.to_string(),
                email: email.to_string(),
                avatar_url: None,
                created_at: now,
                updated_at: now,
            },
        );
        tables.last_user_id = tables.last_user_id.max(id);
        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn update_user(&self, input: &UpdateUserInput) -> Result<Option<User>> {
        let mut tables = self.lock();
        let Some(mut user) = tables.users.get(&input.id).cloned() else {
            return Ok(None);
        };

        input.apply_to(&mut user);
        tables.check_unique_user(Some(user.id), &user.username, &user.email)?;
        user.updated_at = Utc::now();
        tables.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let mut tables = self.lock();
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        tables.markers.retain(|_, m| m.user_id != id);
        tables.shapes.retain(|_, s| s.user_id != id);
        tables.viewports.remove(&id);
        Ok(true)
    }

    async fn insert_marker(&self, input: &CreateMarkerInput) -> Result<Marker> {
        let mut tables = self.lock();
        tables.require_user(input.user_id)?;

        tables.last_marker_id += 1;
        let now = Utc::now();
        let marker = Marker {
            id: tables.last_marker_id,
            user_id: input.user_id,
            latitude: input.latitude,
            longitude: input.longitude,
            title: input.title.clone(),
            description: input.description.clone(),
            color: input
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_MARKER_COLOR.to_string()),
            icon: input.icon.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.markers.insert(marker.id, marker.clone());
        Ok(marker)
    }

    async fn list_markers(&self, filter: &AnnotationFilter) -> Result<Vec<Marker>> {
        let tables = self.lock();
        let markers = tables
            .markers
            .values()
            .filter(|m| filter.user_id.map_or(true, |id| m.user_id == id))
            .filter(|m| {
                filter
                    .bounds
                    .map_or(true, |b| b.contains(m.latitude, m.longitude))
            })
            .cloned()
            .collect();
        Ok(markers)
    }

    async fn update_marker(&self, input: &UpdateMarkerInput) -> Result<Option<Marker>> {
        let mut tables = self.lock();
        let Some(marker) = tables.markers.get_mut(&input.id) else {
            return Ok(None);
        };

        input.apply_to(marker);
        marker.updated_at = Utc::now();
        Ok(Some(marker.clone()))
    }

    async fn delete_marker(&self, id: i64) -> Result<bool> {
        Ok(self.lock().markers.remove(&id).is_some())
    }

    async fn insert_shape(&self, input: &CreateShapeInput) -> Result<Shape> {
        let mut tables = self.lock();
        tables.require_user(input.user_id)?;

        tables.last_shape_id += 1;
        let now = Utc::now();
        let shape = Shape {
            id: tables.last_shape_id,
            user_id: input.user_id,
            shape_type: input.shape_type,
            coordinates: input.coordinates.clone(),
            style: input
                .style
                .clone()
                .unwrap_or_else(|| DEFAULT_SHAPE_STYLE.to_string()),
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.shapes.insert(shape.id, shape.clone());
        Ok(shape)
    }

    async fn list_shapes(&self, filter: &AnnotationFilter) -> Result<Vec<Shape>> {
        let tables = self.lock();
        let mut shapes: Vec<Shape> = tables
            .shapes
            .values()
            .filter(|s| filter.user_id.map_or(true, |id| s.user_id == id))
            .cloned()
            .collect();
        shapes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(shapes)
    }

    async fn update_shape(&self, input: &UpdateShapeInput) -> Result<Option<Shape>> {
        let mut tables = self.lock();
        let Some(shape) = tables.shapes.get_mut(&input.id) else {
            return Ok(None);
        };

        input.apply_to(shape);
        shape.updated_at = Utc::now();
        Ok(Some(shape.clone()))
    }

    async fn delete_shape(&self, id: i64) -> Result<bool> {
        Ok(self.lock().shapes.remove(&id).is_some())
    }

    async fn upsert_viewport(&self, input: &SaveViewportInput) -> Result<ViewportState> {
        let mut tables = self.lock();
        tables.require_user(input.user_id)?;

        let now = Utc::now();
        if let Some(state) = tables.viewports.get_mut(&input.user_id) {
            state.center_latitude = input.center_latitude;
            state.center_longitude = input.center_longitude;
            state.zoom_level = input.zoom_level;
            state.active_basemap = input.active_basemap;
            state.updated_at = now;
            return Ok(state.clone());
        }

        tables.last_viewport_id += 1;
        let state = ViewportState {
            id: tables.last_viewport_id,
            user_id: input.user_id,
            center_latitude: input.center_latitude,
            center_longitude: input.center_longitude,
            zoom_level: input.zoom_level,
            active_basemap: input.active_basemap,
            created_at: now,
            updated_at: now,
        };
        tables.viewports.insert(input.user_id, state.clone());
        Ok(state)
    }

    async fn get_viewport(&self, user_id: i64) -> Result<Option<ViewportState>> {
        Ok(self.lock().viewports.get(&user_id).cloned())
    }
}
