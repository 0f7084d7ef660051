//! Marker and shape persistence with input validation.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{
    AnnotationFilter, CreateMarkerInput, CreateShapeInput, Marker, Shape, UpdateMarkerInput,
    UpdateShapeInput,
};

/// Durable keyed storage for markers and shapes
#[derive(Clone)]
pub struct AnnotationStore {
    db: Db,
}

impl AnnotationStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Validate and insert a marker.
    ///
    /// A missing owner surfaces as `ForeignKey` from the storage layer.
    pub async fn create_marker(&self, input: CreateMarkerInput) -> Result<Marker> {
        input.validate()?;

        let marker = self.db.insert_marker(&input).await?;
        tracing::info!(
            marker_id = marker.id,
            user_id = marker.user_id,
            "Marker created"
        );
        Ok(marker)
    }

    /// Markers matching the filter. Bounds are inclusive on every edge.
    pub async fn list_markers(&self, filter: AnnotationFilter) -> Result<Vec<Marker>> {
        self.db.list_markers(&filter).await
    }

    pub async fn update_marker(&self, input: UpdateMarkerInput) -> Result<Marker> {
        input.validate()?;

        self.db
            .update_marker(&input)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Marker with id {} not found", input.id)))
    }

    /// `false` when no marker had this id
    pub async fn delete_marker(&self, id: i64) -> Result<bool> {
        let deleted = self.db.delete_marker(id).await?;
        if deleted {
            tracing::info!(marker_id = id, "Marker deleted");
        }
        Ok(deleted)
    }

    /// Insert a shape after checking its owner exists.
    ///
    /// `coordinates` and `style` are stored verbatim; `style` defaults to `{}`.
    pub async fn create_shape(&self, input: CreateShapeInput) -> Result<Shape> {
        if !self.db.user_exists(input.user_id).await? {
            return Err(AppError::not_found(format!(
                "User with id {} not found",
                input.user_id
            )));
        }

        let shape = self.db.insert_shape(&input).await?;
        tracing::info!(
            shape_id = shape.id,
            user_id = shape.user_id,
            kind = shape.shape_type.as_str(),
            "Shape created"
        );
        Ok(shape)
    }

    /// Shapes newest first.
    ///
    /// Geometry is opaque here, so `filter.bounds` has no effect.
    pub async fn list_shapes(&self, filter: AnnotationFilter) -> Result<Vec<Shape>> {
        if filter.bounds.is_some() {
            tracing::debug!("Ignoring bounds on shape listing");
        }
        self.db.list_shapes(&filter).await
    }

    pub async fn update_shape(&self, input: UpdateShapeInput) -> Result<Shape> {
        self.db
            .update_shape(&input)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shape with id {} not found", input.id)))
    }

    pub async fn delete_shape(&self, id: i64) -> Result<bool> {
        let deleted = self.db.delete_shape(id).await?;
        if deleted {
            tracing::info!(shape_id = id, "Shape deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryRepository, Repository};
    use crate::models::{Bounds, Patch, ShapeKind};
    use std::sync::Arc;

    async fn store() -> AnnotationStore {
        let repo = MemoryRepository::new();
        repo.ensure_user(1, "demo_user", "demo@example.com")
            .await
            .unwrap();
        AnnotationStore::new(Arc::new(repo))
    }

    fn marker(lat: f64, lng: f64, title: &str) -> CreateMarkerInput {
        CreateMarkerInput {
            user_id: 1,
            latitude: lat,
            longitude: lng,
            title: title.to_string(),
            description: None,
            color: None,
            icon: None,
        }
    }

    fn polygon(name: &str) -> CreateShapeInput {
        CreateShapeInput {
            user_id: 1,
            shape_type: ShapeKind::Polygon,
            coordinates: "[[0,0],[0,1],[1,1]]".to_string(),
            style: None,
            name: Some(name.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_marker_defaults_and_round_trip() {
        let store = store().await;
        let created = store
            .create_marker(marker(40.7128, -74.0060, "NYC"))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.color, "#FF0000");
        assert_eq!(created.latitude, 40.7128);
        assert_eq!(created.longitude, -74.0060);
        assert_eq!(created.description, None);
    }

    #[tokio::test]
    async fn test_create_marker_validation_before_storage() {
        let store = store().await;
        // Would also be an FK miss; validation must win
        let mut input = marker(100.0, 0.0, "bad");
        input.user_id = 42;

        let err = store.create_marker(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_marker_unknown_user() {
        let store = store().await;
        let mut input = marker(1.0, 1.0, "orphan");
        input.user_id = 42;

        let err = store.create_marker(input).await.unwrap_err();
        assert!(matches!(err, AppError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_bounds_filter_selects_exact_subset() {
        let store = store().await;
        let points = [
            (40.0, -74.0),
            (41.0, -74.0), // on north edge
            (41.5, -74.0),
            (40.5, -75.0), // on west edge
            (40.5, -72.0),
        ];
        for (lat, lng) in points {
            store.create_marker(marker(lat, lng, "p")).await.unwrap();
        }

        let bounds = Bounds {
            north: 41.0,
            south: 40.0,
            east: -73.0,
            west: -75.0,
        };
        let found = store
            .list_markers(AnnotationFilter::for_user(1).with_bounds(Some(bounds)))
            .await
            .unwrap();

        let mut coords: Vec<(f64, f64)> = found.iter().map(|m| (m.latitude, m.longitude)).collect();
        coords.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(coords, vec![(40.0, -74.0), (40.5, -75.0), (41.0, -74.0)]);
    }

    #[tokio::test]
    async fn test_update_marker_partial_and_not_found() {
        let store = store().await;
        let mut input = marker(1.0, 1.0, "keep");
        input.description = Some("desc".to_string());
        input.icon = Some("flag".to_string());
        let created = store.create_marker(input).await.unwrap();

        let updated = store
            .update_marker(UpdateMarkerInput {
                id: created.id,
                color: Some("#00FF00".to_string()),
                icon: Patch::Null,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "keep");
        assert_eq!(updated.description.as_deref(), Some("desc"));
        assert_eq!(updated.color, "#00FF00");
        assert_eq!(updated.icon, None);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let err = store
            .update_marker(UpdateMarkerInput {
                id: 999,
                title: Some("x".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_marker_reports_existence() {
        let store = store().await;
        let created = store.create_marker(marker(1.0, 1.0, "x")).await.unwrap();

        assert!(!store.delete_marker(999).await.unwrap());
        assert!(store.delete_marker(created.id).await.unwrap());
        assert!(!store.delete_marker(created.id).await.unwrap());
        assert!(store
            .list_markers(AnnotationFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_shape_unknown_user_is_not_found() {
        let store = store().await;
        let mut input = polygon("p");
        input.user_id = 7;

        let err = store.create_shape(input).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_shapes_newest_first_and_bounds_ignored() {
        let store = store().await;
        let first = store.create_shape(polygon("first")).await.unwrap();
        let second = store.create_shape(polygon("second")).await.unwrap();
        assert_eq!(first.style, "{}");

        let far_away = Bounds {
            north: -80.0,
            south: -89.0,
            east: 10.0,
            west: 0.0,
        };
        let shapes = store
            .list_shapes(AnnotationFilter::for_user(1).with_bounds(Some(far_away)))
            .await
            .unwrap();

        let ids: Vec<i64> = shapes.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_shape_partial() {
        let store = store().await;
        let created = store.create_shape(polygon("zone")).await.unwrap();

        let updated = store
            .update_shape(UpdateShapeInput {
                id: created.id,
                description: Patch::Value("notes".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.coordinates, created.coordinates);
        assert_eq!(updated.style, created.style);
        assert_eq!(updated.name.as_deref(), Some("zone"));
        assert_eq!(updated.description.as_deref(), Some("notes"));

        assert!(store.delete_shape(created.id).await.unwrap());
        assert!(!store.delete_shape(created.id).await.unwrap());
    }
}
