//! Mapmark Library
//!
//! Map annotation sync service: markers, shapes, saved viewports and place
//! search behind a JSON API, plus a client session that keeps working
//! locally when the API is unreachable.

pub mod annotations;
pub mod client;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod places;
pub mod routes;
pub mod users;
pub mod viewport;

pub use config::{ClientConfig, Config};
pub use db::{open_repository, Db};
pub use error::{AppError, Result};
pub use routes::router;

use std::sync::Arc;

use annotations::AnnotationStore;
use places::{Geocoder, PlaceLookup};
use users::UserDirectory;
use viewport::ViewportManager;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub annotations: AnnotationStore,
    pub viewports: ViewportManager,
    pub users: UserDirectory,
    pub places: PlaceLookup,
}

impl AppState {
    /// Wire the services over a repository and a geocoder
    pub fn new(db: Db, geocoder: Arc<dyn Geocoder>, config: Config) -> Self {
        Self {
            annotations: AnnotationStore::new(db.clone()),
            viewports: ViewportManager::new(db.clone()),
            users: UserDirectory::new(db.clone()),
            places: PlaceLookup::new(geocoder),
            db,
            config,
        }
    }
}
