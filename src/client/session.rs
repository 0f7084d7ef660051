use chrono::Utc;
use std::sync::Arc;

use super::{fallback, ClientError, Debouncer, Mode, ModeState, SyncApi, WorkingSet};
use crate::config::ClientConfig;
use crate::constants::{
    DEFAULT_CENTER, DEFAULT_MARKER_COLOR, DEFAULT_ZOOM, DRAWN_SHAPE_STYLE, LOCAL_MODE_BANNER,
    MAX_ZOOM, MIN_ZOOM, NEW_MARKER_TITLE, SEARCH_RESULT_ZOOM,
};
use crate::models::{
    AnnotationFilter, Basemap, BasemapProvider, Bounds, CreateMarkerInput, CreateShapeInput,
    Marker, SaveViewportInput, SearchQuery, SearchResult, Shape, ShapeKind, UpdateMarkerInput,
    UpdateShapeInput, ViewportState,
};

/// Marker as placed by the user, before any id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl MarkerDraft {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            title: NEW_MARKER_TITLE.to_string(),
            description: None,
            color: None,
            icon: None,
        }
    }

    fn into_input(self, user_id: i64) -> CreateMarkerInput {
        CreateMarkerInput {
            user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            title: self.title,
            description: self.description,
            color: self.color,
            icon: self.icon,
        }
    }
}

/// Shape as drawn by the user
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub shape_type: ShapeKind,
    /// Opaque serialized geometry
    pub coordinates: String,
    pub style: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ShapeDraft {
    pub fn new(shape_type: ShapeKind, coordinates: impl Into<String>) -> Self {
        Self {
            shape_type,
            coordinates: coordinates.into(),
            style: DRAWN_SHAPE_STYLE.to_string(),
            name: Some(format!("New {}", shape_type.as_str())),
            description: None,
        }
    }

    fn into_input(self, user_id: i64) -> CreateShapeInput {
        CreateShapeInput {
            user_id,
            shape_type: self.shape_type,
            coordinates: self.coordinates,
            style: Some(self.style),
            name: self.name,
            description: self.description,
        }
    }
}

/// What the map currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom_level: i32,
    pub basemap: Basemap,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_latitude: DEFAULT_CENTER.0,
            center_longitude: DEFAULT_CENTER.1,
            zoom_level: DEFAULT_ZOOM,
            basemap: Basemap::default(),
        }
    }
}

impl MapView {
    /// Tile source family of the active basemap
    pub fn provider(&self) -> BasemapProvider {
        self.basemap.provider()
    }

    fn to_input(self, user_id: i64) -> SaveViewportInput {
        SaveViewportInput {
            user_id,
            center_latitude: self.center_latitude,
            center_longitude: self.center_longitude,
            zoom_level: self.zoom_level,
            active_basemap: self.basemap,
        }
    }
}

impl From<&ViewportState> for MapView {
    fn from(state: &ViewportState) -> Self {
        Self {
            center_latitude: state.center_latitude,
            center_longitude: state.center_longitude,
            zoom_level: state.zoom_level,
            basemap: state.active_basemap,
        }
    }
}

/// Client session that keeps working when the sync API does not.
///
/// Starts LIVE or LOCAL depending on a startup probe. While LIVE every
/// mutation is sent to the API and the server record replaces the optimistic
/// local copy. The first failure (subject to [`DegradePolicy`]) switches the
/// session to LOCAL for good: mutations are then applied in memory only,
/// search falls back to a built-in place set, and viewport changes are no
/// longer persisted.
///
/// [`DegradePolicy`]: super::DegradePolicy
pub struct ResilientSession {
    api: Arc<dyn SyncApi>,
    config: ClientConfig,
    mode: ModeState,
    markers: WorkingSet<Marker>,
    shapes: WorkingSet<Shape>,
    search_results: Vec<SearchResult>,
    view: MapView,
    viewport_writer: Debouncer,
    last_local_id: i64,
}

impl ResilientSession {
    /// Probe the API once and open a session in the resulting mode
    pub async fn connect(api: Arc<dyn SyncApi>, config: ClientConfig) -> Self {
        let mode = match api.healthcheck().await {
            Ok(health) => {
                tracing::info!(status = %health.status, "Sync API reachable");
                Mode::Live
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sync API probe failed, starting in local mode");
                Mode::Local
            }
        };
        Self::with_mode(api, config, mode)
    }

    pub fn with_mode(api: Arc<dyn SyncApi>, config: ClientConfig, mode: Mode) -> Self {
        let viewport_writer = Debouncer::new(config.viewport_debounce);
        Self {
            api,
            config,
            mode: ModeState::new(mode),
            markers: WorkingSet::new(),
            shapes: WorkingSet::new(),
            search_results: Vec::new(),
            view: MapView::default(),
            viewport_writer,
            last_local_id: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    /// Persistent notice shown while in local mode
    pub fn banner(&self) -> Option<&'static str> {
        match self.mode() {
            Mode::Live => None,
            Mode::Local => Some(LOCAL_MODE_BANNER),
        }
    }

    pub fn markers(&self) -> &WorkingSet<Marker> {
        &self.markers
    }

    pub fn shapes(&self) -> &WorkingSet<Shape> {
        &self.shapes
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    /// A viewport save is waiting for its quiet period
    pub fn viewport_save_pending(&self) -> bool {
        self.viewport_writer.is_pending()
    }

    /// Timestamp-derived, strictly increasing within the session
    fn next_local_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_local_id = now.max(self.last_local_id + 1);
        self.last_local_id
    }

    /// Swallow `err` and degrade when the policy says so, otherwise hand it back
    fn absorb(&self, err: ClientError, action: &str) -> Result<(), ClientError> {
        if !self.config.degrade_policy.degrades_on(&err) {
            return Err(err);
        }
        tracing::debug!(action, error = %err, "Applying change locally");
        self.mode.degrade(&err);
        Ok(())
    }

    /// Replace the working sets with the user's stored annotations.
    /// No-op in local mode.
    pub async fn load_map_data(&mut self, bounds: Option<Bounds>) -> Result<(), ClientError> {
        if !self.mode.is_live() {
            return Ok(());
        }

        let filter = AnnotationFilter::for_user(self.config.user_id).with_bounds(bounds);
        let markers = match self.api.list_markers(&filter).await {
            Ok(markers) => markers,
            Err(e) => return self.absorb(e, "list markers"),
        };
        let shapes = match self.api.list_shapes(&filter).await {
            Ok(shapes) => shapes,
            Err(e) => return self.absorb(e, "list shapes"),
        };

        tracing::debug!(
            markers = markers.len(),
            shapes = shapes.len(),
            "Loaded map data"
        );
        self.markers.replace_all(markers);
        self.shapes.replace_all(shapes);
        Ok(())
    }

    pub async fn create_marker(&mut self, draft: MarkerDraft) -> Result<Marker, ClientError> {
        let input = draft.into_input(self.config.user_id);
        let now = Utc::now();
        let local = Marker {
            id: self.next_local_id(),
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
        let key = self.markers.insert_local(local.clone());

        if !self.mode.is_live() {
            return Ok(local);
        }

        match self.api.create_marker(&input).await {
            Ok(marker) => {
                self.markers.confirm(key, marker.clone());
                Ok(marker)
            }
            Err(e) => match self.absorb(e, "create marker") {
                Ok(()) => Ok(local),
                Err(e) => {
                    self.markers.discard(key);
                    Err(e)
                }
            },
        }
    }

    pub async fn update_marker(
        &mut self,
        update: UpdateMarkerInput,
    ) -> Result<Marker, ClientError> {
        if self.mode.is_live() {
            match self.api.update_marker(&update).await {
                Ok(marker) => {
                    self.markers.upsert_server(marker.clone());
                    return Ok(marker);
                }
                Err(e) => self.absorb(e, "update marker")?,
            }
        }

        let marker = self
            .markers
            .get_mut(update.id)
            .ok_or(ClientError::UnknownAnnotation(update.id))?;
        update.apply_to(marker);
        marker.updated_at = Utc::now();
        Ok(marker.clone())
    }

    /// Returns whether a marker was removed
    pub async fn delete_marker(&mut self, id: i64) -> Result<bool, ClientError> {
        if self.mode.is_live() {
            match self.api.delete_marker(id).await {
                Ok(deleted) => {
                    self.markers.remove(id);
                    return Ok(deleted);
                }
                Err(e) => self.absorb(e, "delete marker")?,
            }
        }

        Ok(self.markers.remove(id))
    }

    pub async fn create_shape(&mut self, draft: ShapeDraft) -> Result<Shape, ClientError> {
        let input = draft.into_input(self.config.user_id);
        let now = Utc::now();
        let local = Shape {
            id: self.next_local_id(),
            user_id: input.user_id,
            shape_type: input.shape_type,
            coordinates: input.coordinates.clone(),
            style: input.style.clone().unwrap_or_default(),
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        let key = self.shapes.insert_local(local.clone());

        if !self.mode.is_live() {
            return Ok(local);
        }

        match self.api.create_shape(&input).await {
            Ok(shape) => {
                self.shapes.confirm(key, shape.clone());
                Ok(shape)
            }
            Err(e) => match self.absorb(e, "create shape") {
                Ok(()) => Ok(local),
                Err(e) => {
                    self.shapes.discard(key);
                    Err(e)
                }
            },
        }
    }

    pub async fn update_shape(&mut self, update: UpdateShapeInput) -> Result<Shape, ClientError> {
        if self.mode.is_live() {
            match self.api.update_shape(&update).await {
                Ok(shape) => {
                    self.shapes.upsert_server(shape.clone());
                    return Ok(shape);
                }
                Err(e) => self.absorb(e, "update shape")?,
            }
        }

        let shape = self
            .shapes
            .get_mut(update.id)
            .ok_or(ClientError::UnknownAnnotation(update.id))?;
        update.apply_to(shape);
        shape.updated_at = Utc::now();
        Ok(shape.clone())
    }

    pub async fn delete_shape(&mut self, id: i64) -> Result<bool, ClientError> {
        if self.mode.is_live() {
            match self.api.delete_shape(id).await {
                Ok(deleted) => {
                    self.shapes.remove(id);
                    return Ok(deleted);
                }
                Err(e) => self.absorb(e, "delete shape")?,
            }
        }

        Ok(self.shapes.remove(id))
    }

    /// Look up places. A blank query clears the results without any call.
    pub async fn search(&mut self, query: &str) -> Result<&[SearchResult], ClientError> {
        let query = query.trim();
        if query.is_empty() {
            self.search_results.clear();
            return Ok(&self.search_results);
        }

        if self.mode.is_live() {
            let request = SearchQuery::new(query, Some(self.config.search_limit));
            match self.api.search(&request).await {
                Ok(results) => {
                    self.search_results = results;
                    return Ok(&self.search_results);
                }
                Err(e) => self.absorb(e, "search")?,
            }
        }

        self.search_results = fallback::search(query);
        Ok(&self.search_results)
    }

    /// Center on the result at `index` and clear the result list
    pub fn select_search_result(&mut self, index: usize) -> Option<SearchResult> {
        let result = self.search_results.get(index).cloned()?;
        self.search_results.clear();
        self.view.center_latitude = result.latitude;
        self.view.center_longitude = result.longitude;
        self.view.zoom_level = SEARCH_RESULT_ZOOM;
        self.view_changed();
        Some(result)
    }

    /// Apply the stored viewport, if any, without scheduling a save
    pub async fn restore_viewport(&mut self) -> Result<Option<MapView>, ClientError> {
        if !self.mode.is_live() {
            return Ok(None);
        }

        match self.api.get_viewport(self.config.user_id).await {
            Ok(Some(state)) => {
                self.view = MapView::from(&state);
                Ok(Some(self.view))
            }
            Ok(None) => Ok(None),
            Err(e) => self.absorb(e, "restore viewport").map(|()| None),
        }
    }

    pub fn set_view(&mut self, center_latitude: f64, center_longitude: f64, zoom_level: i32) {
        self.view.center_latitude = center_latitude;
        self.view.center_longitude = center_longitude;
        self.view.zoom_level = zoom_level.clamp(MIN_ZOOM, MAX_ZOOM);
        self.view_changed();
    }

    pub fn pan_to(&mut self, center_latitude: f64, center_longitude: f64) {
        self.set_view(center_latitude, center_longitude, self.view.zoom_level);
    }

    pub fn set_zoom(&mut self, zoom_level: i32) {
        self.set_view(
            self.view.center_latitude,
            self.view.center_longitude,
            zoom_level,
        );
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.view.zoom_level + 1);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.view.zoom_level - 1);
    }

    pub fn set_basemap(&mut self, basemap: Basemap) {
        tracing::debug!(?basemap, provider = ?basemap.provider(), "Basemap selected");
        self.view.basemap = basemap;
        self.view_changed();
    }

    /// Schedule a debounced save of the current view. Skipped in local mode;
    /// the mode is checked again when the timer fires.
    fn view_changed(&mut self) {
        if !self.mode.is_live() {
            return;
        }

        let input = self.view.to_input(self.config.user_id);
        let api = self.api.clone();
        let mode = self.mode.clone();
        let policy = self.config.degrade_policy;

        self.viewport_writer.schedule(async move {
            if !mode.is_live() {
                return;
            }
            match api.save_viewport(&input).await {
                Ok(state) => tracing::debug!(
                    user_id = state.user_id,
                    zoom = state.zoom_level,
                    "Viewport saved"
                ),
                Err(e) if policy.degrades_on(&e) => {
                    mode.degrade(&e);
                }
                Err(e) => tracing::warn!(error = %e, "Viewport save rejected"),
            }
        });
    }
}
