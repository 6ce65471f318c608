//! In-memory session store.
//!
//! The map itself sits behind a short-lived `RwLock`; each session has its
//! own async mutex that a handler holds for the whole interaction, model
//! call included, so one session never sees two interleaved exchanges.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Session, SessionError};

/// A session shared between handlers.
pub type SharedSession = Arc<Mutex<Session>>;

/// All live sessions, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session and return its id.
    pub fn insert(&self, session: Session) -> Result<Uuid, SessionError> {
        let id = session.id();
        self.sessions
            .write()
            .map_err(|_| SessionError::StorePoisoned)?
            .insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Fetch a session handle.
    pub fn get(&self, id: Uuid) -> Result<SharedSession, SessionError> {
        self.sessions
            .read()
            .map_err(|_| SessionError::StorePoisoned)?
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> Result<bool, SessionError> {
        Ok(self
            .sessions
            .write()
            .map_err(|_| SessionError::StorePoisoned)?
            .remove(&id)
            .is_some())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::sample_details;
    use crate::session::ConversationTurn;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SessionStore::new();
        let id = store.insert(Session::new(sample_details())).unwrap();
        assert_eq!(store.len(), 1);

        let handle = store.get(id).unwrap();
        handle.lock().await.push(ConversationTurn::user("hello"));

        let again = store.get(id).unwrap();
        assert_eq!(again.lock().await.history().len(), 2);
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id), Err(SessionError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        let id = store.insert(Session::new(sample_details())).unwrap();
        assert!(store.remove(id).unwrap());
        assert!(!store.remove(id).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_sessions() {
        let store = SessionStore::new();
        let other = store.clone();
        let id = store.insert(Session::new(sample_details())).unwrap();
        assert!(other.get(id).is_ok());
    }
}
