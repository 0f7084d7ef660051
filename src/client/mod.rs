//! Client side of the sync API: an HTTP client and a session that degrades
//! to in-memory operation when the backend is unreachable.

pub mod api;
pub mod debounce;
pub mod error;
pub mod fallback;
pub mod mode;
pub mod session;
pub mod working_set;

pub use api::{HealthStatus, HttpSyncClient, SyncApi};
pub use debounce::Debouncer;
pub use error::ClientError;
pub use mode::{DegradePolicy, Mode, ModeState};
pub use session::{MapView, MarkerDraft, ResilientSession, ShapeDraft};
pub use working_set::{Keyed, Origin, WorkingSet};
