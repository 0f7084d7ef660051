pub mod filter;
pub mod marker;
pub mod patch;
pub mod search;
pub mod shape;
pub mod user;
pub mod validate;
pub mod viewport;

pub use filter::{AnnotationFilter, AnnotationQuery, Bounds};
pub use marker::{CreateMarkerInput, Marker, UpdateMarkerInput};
pub use patch::Patch;
pub use search::{SearchQuery, SearchResult};
pub use shape::{CreateShapeInput, Shape, ShapeKind, UpdateShapeInput};
pub use user::{CreateUserInput, UpdateUserInput, User};
pub use viewport::{Basemap, BasemapProvider, SaveViewportInput, ViewportState};
