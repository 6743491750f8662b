//! Transport-facing game service
//!
//! [`GameService`] is the surface the (external) HTTP layer calls: it
//! resolves sessions through the store, runs each operation under the
//! session's own lock, and shapes responses the frontend can render
//! directly. It adds no game rules of its own; arbitration lives entirely
//! in the engine.

use crate::config::SessionConfig;
use crate::engine::{RequestOutcome, SessionSnapshot};
use crate::error::Result;
use crate::safety::SafetyVerdict;
use crate::store::SessionStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const MSG_INITIALIZED: &str =
    "Round initialized. Allocate resources without leaving the safe state.";
const MSG_ALREADY_INITIALIZED: &str = "Round already initialized";
const MSG_RESET: &str = "Round reset to its initial state";

/// Response to `initialize` and `reset`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    pub state: SessionSnapshot,
    pub message: String,
}

/// Response to `release_resources`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResponse {
    pub released: bool,
}

/// Session-keyed entry point for all game operations
pub struct GameService {
    store: SessionStore,
}

impl GameService {
    /// Service whose sessions play the standard scenario
    pub fn new() -> Self {
        Self::with_config(SessionConfig::standard())
    }

    /// Service whose sessions play a custom scenario
    pub fn with_config(config: SessionConfig) -> Self {
        GameService {
            store: SessionStore::new(config),
        }
    }

    /// Create the session on first call; idempotent until `reset`
    ///
    /// Re-initializing an active session is a no-op that returns the
    /// existing state, so a page reload never loses progress.
    pub fn initialize(&self, session_id: &str) -> InitializeResponse {
        let (handle, created) = self.store.get_or_create(session_id);
        let state = handle.lock().snapshot();

        if created {
            info!(session_id, "session initialized");
        } else {
            debug!(session_id, "initialize on existing session");
        }

        InitializeResponse {
            state,
            message: if created {
                MSG_INITIALIZED.to_string()
            } else {
                MSG_ALREADY_INITIALIZED.to_string()
            },
        }
    }

    /// Full read-only snapshot of a session
    pub fn state(&self, session_id: &str) -> Result<SessionSnapshot> {
        Ok(self.store.get(session_id)?.lock().snapshot())
    }

    /// Safety verdict for the session's current state; never mutates
    pub fn check_safety(&self, session_id: &str) -> Result<SafetyVerdict> {
        let verdict = self.store.get(session_id)?.lock().check_safety();
        debug!(session_id, safe = verdict.safe, "safety check");
        Ok(verdict)
    }

    /// Arbitrate a resource request for one process
    pub fn request_resources(
        &self,
        session_id: &str,
        process: usize,
        request: &[u32],
    ) -> Result<RequestOutcome> {
        let handle = self.store.get(session_id)?;
        let outcome = handle.lock().request(process, request)?;

        debug!(
            session_id,
            process,
            granted = outcome.granted,
            reason = outcome.reason.as_deref().unwrap_or("granted"),
            "resource request"
        );
        Ok(outcome)
    }

    /// Return a process's entire allocation to the pool
    pub fn release_resources(&self, session_id: &str, process: usize) -> Result<ReleaseResponse> {
        let handle = self.store.get(session_id)?;
        handle.lock().release(process)?;

        debug!(session_id, process, "resources released");
        Ok(ReleaseResponse { released: true })
    }

    /// Rebuild the session from its original configuration
    pub fn reset(&self, session_id: &str) -> Result<InitializeResponse> {
        let handle = self.store.get(session_id)?;
        let state = {
            let mut engine = handle.lock();
            engine.reset();
            engine.snapshot()
        };

        info!(session_id, "session reset");
        Ok(InitializeResponse {
            state,
            message: MSG_RESET.to_string(),
        })
    }

    /// Discard a session entirely (called by the owning session layer on
    /// expiry); returns whether it existed
    pub fn expire(&self, session_id: &str) -> bool {
        let existed = self.store.remove(session_id);
        if existed {
            info!(session_id, "session expired");
        }
        existed
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.store.len()
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new()
    }
}
