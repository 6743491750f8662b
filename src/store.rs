//! Concurrent session store
//!
//! Maps an opaque session identifier to its [`AllocationEngine`]. The outer
//! map lock is held only long enough to resolve, insert, or remove an entry;
//! each engine sits behind its own `Arc<Mutex<..>>`, so operations on the
//! same session serialize while distinct sessions never contend.

use crate::config::SessionConfig;
use crate::engine::AllocationEngine;
use crate::error::{BankerError, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle to one session's engine
pub type SessionHandle = Arc<Mutex<AllocationEngine>>;

type SessionMap = HashMap<String, SessionHandle, ahash::RandomState>;

/// Session-keyed registry of allocation engines
pub struct SessionStore {
    /// Template every new session is initialized from
    config: SessionConfig,
    sessions: RwLock<SessionMap>,
}

impl SessionStore {
    /// Create a store whose sessions all start from `config`
    pub fn new(config: SessionConfig) -> Self {
        SessionStore {
            config,
            sessions: RwLock::new(SessionMap::default()),
        }
    }

    /// Resolve a session, creating it on first sight
    ///
    /// Returns the handle and whether this call created the session.
    /// Insert-if-absent: a concurrent creator of the same id wins exactly
    /// once and both callers get the same handle.
    pub fn get_or_create(&self, session_id: &str) -> (SessionHandle, bool) {
        if let Some(handle) = self.sessions.read().get(session_id) {
            return (Arc::clone(handle), false);
        }

        // Re-check under the write lock; another thread may have created the
        // entry between the two acquisitions.
        let mut sessions = self.sessions.write();
        if let Some(handle) = sessions.get(session_id) {
            return (Arc::clone(handle), false);
        }

        let handle = Arc::new(Mutex::new(AllocationEngine::new(self.config.clone())));
        sessions.insert(session_id.to_string(), Arc::clone(&handle));
        (handle, true)
    }

    /// Resolve an existing session
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the id has never been initialized (or
    /// has been removed).
    pub fn get(&self, session_id: &str) -> Result<SessionHandle> {
        self.sessions
            .read()
            .get(session_id)
            .map(Arc::clone)
            .ok_or_else(|| BankerError::SessionNotFound(session_id.to_string()))
    }

    /// Discard a session; returns whether it existed
    ///
    /// In-flight operations holding the session handle finish normally; the
    /// engine is dropped with the last handle.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
