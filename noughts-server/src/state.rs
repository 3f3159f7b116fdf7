//! Server state management
//!
//! Every session owns its own game and scoreboard; the map only hands out
//! exclusive access to one session at a time. The number of live sessions is
//! capped; clients free a slot with `DELETE /api/games/{id}`.

use noughts_core::{Session, SessionConfig};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Live sessions allowed at once unless configured otherwise
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Server-wide shared state
pub struct ServerState {
    sessions: RwLock<FxHashMap<String, Session>>,
    next_id: AtomicU64,
    max_sessions: usize,
    /// Settings new sessions start from
    pub defaults: SessionConfig,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_defaults(SessionConfig::default())
    }

    pub fn with_defaults(defaults: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
            max_sessions: DEFAULT_MAX_SESSIONS,
            defaults,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Register a session and return its id, or `None` when the server is full
    pub fn insert(&self, session: Session) -> Option<String> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.len() >= self.max_sessions {
            tracing::warn!("Session limit of {} reached", self.max_sessions);
            return None;
        }
        let id = format!("game-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        sessions.insert(id.clone(), session);
        Some(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Run `f` with exclusive access to one session
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.get_mut(id).map(f)
    }

    pub fn remove(&self, id: &str) -> Option<Session> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
