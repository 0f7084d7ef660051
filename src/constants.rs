/// Color assigned to markers created without one
pub const DEFAULT_MARKER_COLOR: &str = "#FF0000";

/// Style payload stored for shapes created without one
pub const DEFAULT_SHAPE_STYLE: &str = "{}";

/// Maximum marker title length in characters
pub const MAX_TITLE_LEN: usize = 255;

/// Latitude range (degrees)
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;

/// Longitude range (degrees)
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Zoom levels accepted for a saved viewport
pub const MIN_ZOOM: i32 = 1;
pub const MAX_ZOOM: i32 = 20;

/// Zoom applied when centering on a selected search result
pub const SEARCH_RESULT_ZOOM: i32 = 15;

/// Username length bounds
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;

/// Search result limit bounds and default
pub const MIN_SEARCH_LIMIT: u32 = 1;
pub const MAX_SEARCH_LIMIT: u32 = 50;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Sentinel place id for provider records carrying no identifier
pub const UNKNOWN_PLACE_ID: &str = "unknown";

/// Quiescence delay before a viewport change is persisted (milliseconds)
pub const VIEWPORT_DEBOUNCE_MS: u64 = 1000;

/// Style given to newly drawn shapes
pub const DRAWN_SHAPE_STYLE: &str =
    r##"{"fillColor":"#3388ff","fillOpacity":0.2,"color":"#3388ff","weight":3,"opacity":0.8}"##;

/// Banner shown for the rest of the session once the client has degraded
pub const LOCAL_MODE_BANNER: &str =
    "Offline mode: the server is unreachable, changes are kept on this device only";

/// Title given to newly dropped markers
pub const NEW_MARKER_TITLE: &str = "New Marker";

/// Map view shown before any viewport is restored (San Francisco)
pub const DEFAULT_CENTER: (f64, f64) = (37.7749, -122.4194);
pub const DEFAULT_ZOOM: i32 = 10;

/// Demo identity seeded on startup when enabled
pub const DEMO_USER_ID: i64 = 1;
pub const DEMO_USERNAME: &str = "demo_user";
pub const DEMO_EMAIL: &str = "demo@example.com";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_LATITUDE_RANGE: &str = "Latitude must be between -90 and 90";

pub const ERR_LONGITUDE_RANGE: &str = "Longitude must be between -180 and 180";

pub const ERR_TITLE_LENGTH: &str = "Title must be between 1 and 255 characters";

pub const ERR_COLOR_FORMAT: &str = "Color must be a hex string like #RRGGBB";

pub const ERR_ZOOM_RANGE: &str = "Zoom level must be between 1 and 20";

pub const ERR_EMPTY_QUERY: &str = "Search query must not be empty";

pub const ERR_SEARCH_LIMIT: &str = "Search limit must be between 1 and 50";

pub const ERR_INCOMPLETE_BOUNDS: &str = "Bounding box requires all of north, south, east and west";

pub const ERR_USERNAME_LENGTH: &str = "Username must be between 3 and 50 characters";

pub const ERR_EMAIL_FORMAT: &str = "Email address is not valid";

pub const ERR_AVATAR_URL: &str = "Avatar URL must be an http(s) URL";
