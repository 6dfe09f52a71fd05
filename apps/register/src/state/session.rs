//! # Register Session
//!
//! One operator's register: the engine, the load phase of each collection
//! and the queue its changes are persisted through.
//!
//! ## Mutation → Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command ──► engine.add_to_cart(..)  (marks Products, TakeawayCart)     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  Session::persist()                                                    │
//! │    for each dirty collection:                                           │
//! │      Loaded?  ── yes ──► snapshot JSON ──► writer.enqueue(key, json)    │
//! │         │                                                               │
//! │         └──── no ───► dropped (stored record not read yet)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::{Collection, PosEngine, Settings};
use cashier_db::{DbResult, WriteQueueHandle};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::lifecycle::{CollectionPhase, Lifecycle};

/// What happened when a collection's stored record was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The stored value replaced the default.
    Restored,
    /// Nothing stored yet; the default stays.
    Missing,
    /// The read failed or the record was unreadable; the default stays.
    Fallback,
    /// The collection was not loading; nothing applied.
    Skipped,
}

/// Register session state.
#[derive(Debug)]
pub struct Session {
    engine: PosEngine,
    lifecycle: Lifecycle,
    /// `None` for sessions that never persist.
    writer: Option<WriteQueueHandle>,
}

impl Session {
    /// A session serving `settings` until the stored records load.
    pub fn new(settings: Settings, writer: Option<WriteQueueHandle>) -> Self {
        Session {
            engine: PosEngine::new(settings),
            lifecycle: Lifecycle::new(),
            writer,
        }
    }

    pub fn engine(&self) -> &PosEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PosEngine {
        &mut self.engine
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn writer(&self) -> Option<&WriteQueueHandle> {
        self.writer.as_ref()
    }

    pub fn begin_load(&mut self, collection: Collection) -> bool {
        let started = self.lifecycle.begin_load(collection);
        if started {
            debug!(collection = %collection, "Loading stored record");
        }
        started
    }

    /// Applies the result of reading `collection` from storage and marks it
    /// loaded. Read and parse failures keep the in-memory default.
    pub fn finish_load(
        &mut self,
        collection: Collection,
        stored: DbResult<Option<String>>,
    ) -> LoadOutcome {
        if self.lifecycle.phase(collection) != CollectionPhase::Loading {
            warn!(collection = %collection, "Load finished for a collection that was not loading");
            return LoadOutcome::Skipped;
        }

        let outcome = match stored {
            Ok(Some(json)) => match self.engine.restore(collection, &json) {
                Ok(()) => LoadOutcome::Restored,
                Err(e) => {
                    warn!(collection = %collection, error = %e, "Stored record is unreadable, using default");
                    LoadOutcome::Fallback
                }
            },
            Ok(None) => LoadOutcome::Missing,
            Err(e) => {
                warn!(collection = %collection, error = %e, "Failed to read stored record, using default");
                LoadOutcome::Fallback
            }
        };

        self.lifecycle.finish_load(collection);
        info!(collection = %collection, outcome = ?outcome, "Collection loaded");
        outcome
    }

    /// Queues a write for every collection changed since the last call.
    ///
    /// Returns how many writes were queued.
    pub fn persist(&mut self) -> usize {
        let mut queued = 0;

        for collection in self.engine.take_dirty() {
            if !self.lifecycle.is_loaded(collection) {
                debug!(collection = %collection, "Write skipped: stored record not loaded yet");
                continue;
            }
            let Some(writer) = &self.writer else {
                continue;
            };

            let json = match self.engine.snapshot(collection) {
                Ok(json) => json,
                Err(e) => {
                    error!(collection = %collection, error = %e, "Failed to serialize collection");
                    continue;
                }
            };

            match writer.enqueue(collection.key(), json) {
                Ok(()) => queued += 1,
                Err(e) => error!(collection = %collection, error = %e, "Failed to queue write"),
            }
        }

        queued
    }
}
