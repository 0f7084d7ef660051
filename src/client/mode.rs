use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::ClientError;

/// Where mutations are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Backed by the remote sync API
    Live,
    /// In-memory only for the rest of the session
    Local,
}

/// Which failed calls move the session to [`Mode::Local`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegradePolicy {
    /// Every failure degrades, including validation rejections
    #[default]
    AnyError,
    /// Only transport and server failures degrade. A 4xx rejection is
    /// returned to the caller and the session stays live.
    TransportOnly,
}

impl DegradePolicy {
    pub fn degrades_on(&self, err: &ClientError) -> bool {
        match self {
            DegradePolicy::AnyError => true,
            DegradePolicy::TransportOnly => !err.is_rejection(),
        }
    }
}

/// Two-state machine with a single one-way transition, LIVE to LOCAL.
///
/// Clones share state, so the background viewport writer and the session
/// observe the same mode.
#[derive(Debug, Clone)]
pub struct ModeState {
    local: Arc<AtomicBool>,
}

impl ModeState {
    pub fn new(initial: Mode) -> Self {
        Self {
            local: Arc::new(AtomicBool::new(initial == Mode::Local)),
        }
    }

    pub fn current(&self) -> Mode {
        if self.local.load(Ordering::SeqCst) {
            Mode::Local
        } else {
            Mode::Live
        }
    }

    pub fn is_live(&self) -> bool {
        self.current() == Mode::Live
    }

    /// Enter LOCAL. Returns `true` only for the call that made the transition.
    pub fn degrade(&self, cause: &dyn Display) -> bool {
        let was_local = self.local.swap(true, Ordering::SeqCst);
        if !was_local {
            tracing::warn!(%cause, "Sync API unavailable, switching to local mode");
        }
        !was_local
    }
}
