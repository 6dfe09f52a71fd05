//! # Shared Session State
//!
//! The session wrapped for concurrent command handlers.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Every command reads or mutates it
//! 2. Only one command may mutate at a time, and each runs to completion
//! 3. Commands may be issued from several tasks
//!
//! The lock is never held across an `.await`: hydration takes it once to
//! enter `Loading` and once to apply the read result.

use std::sync::{Arc, Mutex};

use cashier_core::{Collection, PosEngine};
use cashier_db::{DbResult, KeyValueStore, WriteStats};
use serde::Serialize;
use tracing::info;

use super::session::{LoadOutcome, Session};

/// Per-collection result of [`SessionState::hydrate`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationReport {
    pub outcomes: Vec<(Collection, LoadOutcome)>,
}

impl HydrationReport {
    pub fn outcome(&self, collection: Collection) -> Option<LoadOutcome> {
        self.outcomes
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, outcome)| *outcome)
    }

    pub fn count(&self, outcome: LoadOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Thread-safe session handle shared by every command.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    pub fn new(session: Session) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = state.with_session(|s| s.engine().products().len());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session, then queues
    /// writes for whatever it changed.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().expect("Session mutex poisoned");
        let result = f(&mut session);
        session.persist();
        result
    }

    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PosEngine) -> R,
    {
        self.with_session(|s| f(s.engine()))
    }

    /// Runs a mutation against the engine and persists its changes.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_engine_mut(|engine| engine.add_to_cart(product_id))?;
    /// ```
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PosEngine) -> R,
    {
        self.with_session_mut(|s| f(s.engine_mut()))
    }

    /// Reads every collection from `store` and applies it to the session.
    ///
    /// Until a collection's read completes the session keeps serving its
    /// default, and changes to it are not written.
    pub async fn hydrate(&self, store: &dyn KeyValueStore) -> HydrationReport {
        let mut report = HydrationReport::default();

        for collection in Collection::ALL {
            if !self.with_session_mut(|s| s.begin_load(collection)) {
                report.outcomes.push((collection, LoadOutcome::Skipped));
                continue;
            }

            let stored = store.get(collection.key()).await;
            let outcome = self.with_session_mut(|s| s.finish_load(collection, stored));
            report.outcomes.push((collection, outcome));
        }

        info!(
            restored = report.count(LoadOutcome::Restored),
            missing = report.count(LoadOutcome::Missing),
            fallback = report.count(LoadOutcome::Fallback),
            "Session hydrated"
        );
        report
    }

    /// Waits for every queued write to land.
    pub async fn flush(&self) -> DbResult<WriteStats> {
        match self.with_session(|s| s.writer().cloned()) {
            Some(writer) => writer.flush().await,
            None => Ok(WriteStats::default()),
        }
    }

    /// Drains the write queue and stops it.
    pub async fn shutdown(&self) -> DbResult<WriteStats> {
        match self.with_session(|s| s.writer().cloned()) {
            Some(writer) => writer.shutdown().await,
            None => Ok(WriteStats::default()),
        }
    }
}
