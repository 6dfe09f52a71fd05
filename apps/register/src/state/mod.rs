//! # State Module
//!
//! Session state for the register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ConfigState (read-only after startup)                                 │
//! │       │ default_settings()                                              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SessionState = Arc<Mutex<Session>>                             │   │
//! │  │                                                                 │   │
//! │  │  Session                                                        │   │
//! │  │  ├── engine:    PosEngine          (every collection)           │   │
//! │  │  ├── lifecycle: Lifecycle          (Default/Loading/Loaded)     │   │
//! │  │  └── writer:    WriteQueueHandle   (ordered, fire-and-forget)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ConfigState: immutable, cloned where needed                         │
//! │  • SessionState: every command runs to completion under the Mutex     │
//! │  • WriteQueue: its own task; the handle is a channel sender           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod lifecycle;
mod session;
mod shared;

pub use config::{ConfigError, ConfigState};
pub use lifecycle::{CollectionPhase, Lifecycle};
pub use session::{LoadOutcome, Session};
pub use shared::{HydrationReport, SessionState};
