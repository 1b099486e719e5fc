//! Per-session comparison state.
//!
//! The UI reads back "the last text I submitted" and "the last chunk table"
//! in follow-up requests. That state lives here, keyed by a caller-chosen
//! session id, instead of in process-wide variables.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Default number of sessions kept before the oldest is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 256;

#[derive(Debug, Default, Clone)]
struct SessionState {
    your_text: String,
    chunk_similarities: Vec<f64>,
}

#[derive(Debug, Default)]
struct Sessions {
    states: HashMap<String, SessionState>,
    /// Session ids in creation order, oldest first.
    order: VecDeque<String>,
}

/// Bounded map from session id to the last comparison made in that session.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    inner: Mutex<Sessions>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// Create a store holding at most `capacity` sessions (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Sessions::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_session(&self, id: &str, update: impl FnOnce(&mut SessionState)) {
        let mut sessions = self.lock();
        if !sessions.states.contains_key(id) {
            while sessions.order.len() >= self.capacity {
                if let Some(oldest) = sessions.order.pop_front() {
                    debug!(session = %oldest, "evicting session");
                    sessions.states.remove(&oldest);
                }
            }
            sessions.order.push_back(id.to_owned());
        }
        update(sessions.states.entry(id.to_owned()).or_default());
    }

    /// Remember the text most recently submitted in `id`.
    pub fn record_text(&self, id: &str, text: &str) {
        self.with_session(id, |s| text.clone_into(&mut s.your_text));
    }

    /// Remember the chunk table most recently computed in `id`.
    pub fn record_chunks(&self, id: &str, scores: &[f64]) {
        self.with_session(id, |s| scores.clone_into(&mut s.chunk_similarities));
    }

    pub fn last_text(&self, id: &str) -> Option<String> {
        self.lock().states.get(id).map(|s| s.your_text.clone())
    }

    pub fn last_chunks(&self, id: &str) -> Option<Vec<f64>> {
        self.lock().states.get(id).map(|s| s.chunk_similarities.clone())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
