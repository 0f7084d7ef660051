use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use std::time::Duration;

use super::Repository;
use crate::constants::{DEFAULT_MARKER_COLOR, DEFAULT_SHAPE_STYLE};
use crate::error::Result;
use crate::models::{
    AnnotationFilter, CreateMarkerInput, CreateShapeInput, CreateUserInput, Marker,
    SaveViewportInput, Shape, UpdateMarkerInput, UpdateShapeInput, UpdateUserInput, User,
    ViewportState,
};

const USER_COLUMNS: &str = "id, username, email, avatar_url, created_at, updated_at";

const MARKER_COLUMNS: &str =
    "id, user_id, latitude, longitude, title, description, color, icon, created_at, updated_at";

const SHAPE_COLUMNS: &str =
    "id, user_id, shape_type, coordinates, style, name, description, created_at, updated_at";

const VIEWPORT_COLUMNS: &str = "id, user_id, center_latitude, center_longitude, zoom_level, \
     active_basemap, created_at, updated_at";

/// Postgres-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a PostgreSQL connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Creating database connection pool...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        tracing::info!("Database connection pool created successfully");

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn user_exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert_user(&self, input: &CreateUserInput) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (username, email, avatar_url) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.avatar_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn ensure_user(&self, id: i64, username: &str, email: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, username, email) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .execute(&mut *tx)
        .await?;

        // Explicit ids bypass the sequence; move it past them
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('users', 'id'), \
             GREATEST((SELECT MAX(id) FROM users), 1))",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, input: &UpdateUserInput) -> Result<Option<User>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE users SET updated_at = NOW()");
        if let Some(username) = &input.username {
            qb.push(", username = ").push_bind(username.clone());
        }
        if let Some(email) = &input.email {
            qb.push(", email = ").push_bind(email.clone());
        }
        if let Some(avatar_url) = input.avatar_url.clone().into_update() {
            qb.push(", avatar_url = ").push_bind(avatar_url);
        }
        qb.push(" WHERE id = ").push_bind(input.id);
        qb.push(" RETURNING ").push(USER_COLUMNS);

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_marker(&self, input: &CreateMarkerInput) -> Result<Marker> {
        let sql = format!(
            "INSERT INTO markers (user_id, latitude, longitude, title, description, color, icon) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            MARKER_COLUMNS
        );
        let marker = sqlx::query_as::<_, Marker>(&sql)
            .bind(input.user_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.color.as_deref().unwrap_or(DEFAULT_MARKER_COLOR))
            .bind(&input.icon)
            .fetch_one(&self.pool)
            .await?;
        Ok(marker)
    }

    async fn list_markers(&self, filter: &AnnotationFilter) -> Result<Vec<Marker>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(MARKER_COLUMNS).push(" FROM markers WHERE TRUE");

        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(bounds) = filter.bounds {
            qb.push(" AND latitude >= ").push_bind(bounds.south);
            qb.push(" AND latitude <= ").push_bind(bounds.north);
            qb.push(" AND longitude >= ").push_bind(bounds.west);
            qb.push(" AND longitude <= ").push_bind(bounds.east);
        }
        qb.push(" ORDER BY id");

        let markers = qb.build_query_as::<Marker>().fetch_all(&self.pool).await?;
        Ok(markers)
    }

    async fn update_marker(&self, input: &UpdateMarkerInput) -> Result<Option<Marker>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE markers SET updated_at = NOW()");
        if let Some(title) = &input.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = input.description.clone().into_update() {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(color) = &input.color {
            qb.push(", color = ").push_bind(color.clone());
        }
        if let Some(icon) = input.icon.clone().into_update() {
            qb.push(", icon = ").push_bind(icon);
        }
        qb.push(" WHERE id = ").push_bind(input.id);
        qb.push(" RETURNING ").push(MARKER_COLUMNS);

        let marker = qb
            .build_query_as::<Marker>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(marker)
    }

    async fn delete_marker(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM markers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_shape(&self, input: &CreateShapeInput) -> Result<Shape> {
        let sql = format!(
            "INSERT INTO shapes (user_id, shape_type, coordinates, style, name, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            SHAPE_COLUMNS
        );
        let shape = sqlx::query_as::<_, Shape>(&sql)
            .bind(input.user_id)
            .bind(input.shape_type)
            .bind(&input.coordinates)
            .bind(input.style.as_deref().unwrap_or(DEFAULT_SHAPE_STYLE))
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(shape)
    }

    async fn list_shapes(&self, filter: &AnnotationFilter) -> Result<Vec<Shape>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        qb.push(SHAPE_COLUMNS).push(" FROM shapes WHERE TRUE");

        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let shapes = qb.build_query_as::<Shape>().fetch_all(&self.pool).await?;
        Ok(shapes)
    }

    async fn update_shape(&self, input: &UpdateShapeInput) -> Result<Option<Shape>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE shapes SET updated_at = NOW()");
        if let Some(coordinates) = &input.coordinates {
            qb.push(", coordinates = ").push_bind(coordinates.clone());
        }
        if let Some(style) = &input.style {
            qb.push(", style = ").push_bind(style.clone());
        }
        if let Some(name) = input.name.clone().into_update() {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(description) = input.description.clone().into_update() {
            qb.push(", description = ").push_bind(description);
        }
        qb.push(" WHERE id = ").push_bind(input.id);
        qb.push(" RETURNING ").push(SHAPE_COLUMNS);

        let shape = qb
            .build_query_as::<Shape>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(shape)
    }

    async fn delete_shape(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shapes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_viewport(&self, input: &SaveViewportInput) -> Result<ViewportState> {
        let sql = format!(
            "INSERT INTO viewport_states \
                 (user_id, center_latitude, center_longitude, zoom_level, active_basemap) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 center_latitude = EXCLUDED.center_latitude, \
                 center_longitude = EXCLUDED.center_longitude, \
                 zoom_level = EXCLUDED.zoom_level, \
                 active_basemap = EXCLUDED.active_basemap, \
                 updated_at = NOW() \
             RETURNING {}",
            VIEWPORT_COLUMNS
        );
        let state = sqlx::query_as::<_, ViewportState>(&sql)
            .bind(input.user_id)
            .bind(input.center_latitude)
            .bind(input.center_longitude)
            .bind(input.zoom_level)
            .bind(input.active_basemap)
            .fetch_one(&self.pool)
            .await?;
        Ok(state)
    }

    async fn get_viewport(&self, user_id: i64) -> Result<Option<ViewportState>> {
        let sql = format!(
            "SELECT {} FROM viewport_states WHERE user_id = $1",
            VIEWPORT_COLUMNS
        );
        let state = sqlx::query_as::<_, ViewportState>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(state)
    }
}
