pub mod extract;
pub mod health;
pub mod markers;
pub mod search;
pub mod shapes;
pub mod users;
pub mod viewport;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use health::health_check;
pub use markers::{create_marker, delete_marker, list_markers, update_marker};
pub use search::search_places;
pub use shapes::{create_shape, delete_shape, list_shapes, update_shape};
pub use users::{create_user, delete_user, get_user, update_user};
pub use viewport::{get_viewport, save_viewport};

use crate::AppState;

/// Build the sync API router
pub fn router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/api/markers", post(create_marker).get(list_markers))
        .route(
            "/api/markers/:id",
            patch(update_marker).delete(delete_marker),
        )
        .route("/api/shapes", post(create_shape).get(list_shapes))
        .route("/api/shapes/:id", patch(update_shape).delete(delete_shape))
        .route("/api/viewport", put(save_viewport))
        .route("/api/viewport/:user_id", get(get_viewport))
        .route("/api/search", get(search_places))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
