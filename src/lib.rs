//! # Banker - Resource-Allocation Safety Engine
//!
//! `banker-rs` implements the deadlock-avoidance core of the OS Escape game:
//! the Banker's Algorithm safety test, the allocation engine that arbitrates
//! resource requests against it, and the concurrent session registry the
//! (external) transport layer drives.
//!
//! ## Features
//!
//! - **Safety test**: pure Banker's Algorithm check with a deterministic
//!   completion sequence
//! - **Speculate-then-swap arbitration**: requests are applied to a copied
//!   state and committed only when the result is safe, so denials can never
//!   corrupt the conservation invariant
//! - **Append-only audit history** with per-process scoring and a one-time
//!   completion bonus
//! - **Per-session locking**: operations on one session serialize; distinct
//!   sessions never contend
//!
//! ## Quick Start
//!
//! ```rust
//! use banker_rs::GameService;
//!
//! let service = GameService::new();
//!
//! // First call creates the session; later calls are no-ops.
//! let response = service.initialize("player-42");
//! assert!(!response.state.completed);
//!
//! // Ask for resources; the engine grants only if the result stays safe.
//! let outcome = service.request_resources("player-42", 1, &[1, 0, 2]).unwrap();
//! assert!(outcome.granted);
//!
//! // The current state is always provably safe after a grant.
//! assert!(service.check_safety("player-42").unwrap().safe);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! GameService          transport-facing facade (messages, payload shapes)
//!     │
//!     ▼
//! SessionStore         session id → Arc<Mutex<AllocationEngine>>
//!     │
//!     ▼
//! AllocationEngine     one session's state; request/release/reset arbitration
//!     │                        │
//!     ▼                        ▼
//! safety::is_safe      HistoryLog + score
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod safety;
pub mod service;
pub mod store;
pub mod vector;

// Re-export commonly used types
pub use config::SessionConfig;
pub use engine::{AllocationEngine, RequestOutcome, SessionSnapshot};
pub use error::{BankerError, Result};
pub use history::{ActionKind, HistoryEntry, HistoryLog, COMPLETION_BONUS, PROCESS_POINTS};
pub use safety::{is_safe, SafetyVerdict};
pub use service::{GameService, InitializeResponse, ReleaseResponse};
pub use store::{SessionHandle, SessionStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
