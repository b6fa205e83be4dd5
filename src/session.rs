//! Per-user session storage
//!
//! Sessions live in a keyed in-memory map. Each entry carries its own mutex
//! so that transitions for the same user are serialized while distinct users
//! proceed independently. Entries are created on first access and never
//! removed; restarts reset the session value in place.

use crate::dialog::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Keyed store of dialog sessions.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session slot for a user, creating a default one if absent.
    ///
    /// The caller locks the returned mutex for the whole read-modify-write
    /// of a transition; the outer map lock is never held across it.
    pub async fn entry(&self, user_id: &str) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(slot) = sessions.get(user_id) {
                return slot.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::default())))
            .clone()
    }

    /// Current session value for a user, if one exists.
    #[allow(dead_code)] // Useful for tests and inspection
    pub async fn snapshot(&self, user_id: &str) -> Option<Session> {
        let slot = {
            let sessions = self.sessions.read().await;
            sessions.get(user_id)?.clone()
        };
        let session = slot.lock().await;
        Some(session.clone())
    }

    /// Number of known users.
    #[allow(dead_code)] // Useful for tests
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
