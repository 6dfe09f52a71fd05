//! # Durable State Lifecycle
//!
//! Tracks, per collection, whether its stored record has been read yet.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Per-Collection Lifecycle                              │
//! │                                                                         │
//! │   ┌─────────┐  begin_load   ┌─────────┐  finish_load   ┌─────────┐    │
//! │   │ Default │──────────────►│ Loading │───────────────►│ Loaded  │    │
//! │   └─────────┘               └─────────┘                └─────────┘    │
//! │                                                                         │
//! │   Default / Loading: in-memory default is served; mutations are NOT    │
//! │                      written (they would overwrite the stored record)  │
//! │   Loaded:            every mutation is mirrored to storage             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use cashier_core::Collection;
use serde::Serialize;

/// Load phase of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionPhase {
    #[default]
    Default,
    Loading,
    Loaded,
}

/// Phase of every collection.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    phases: BTreeMap<Collection, CollectionPhase>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, collection: Collection) -> CollectionPhase {
        self.phases.get(&collection).copied().unwrap_or_default()
    }

    /// `Default → Loading`. Returns false if the collection was not in
    /// `Default`.
    pub fn begin_load(&mut self, collection: Collection) -> bool {
        self.advance(collection, CollectionPhase::Default, CollectionPhase::Loading)
    }

    /// `Loading → Loaded`. Returns false if the collection was not loading.
    pub fn finish_load(&mut self, collection: Collection) -> bool {
        self.advance(collection, CollectionPhase::Loading, CollectionPhase::Loaded)
    }

    /// Whether writes for `collection` may reach storage.
    pub fn is_loaded(&self, collection: Collection) -> bool {
        self.phase(collection) == CollectionPhase::Loaded
    }

    pub fn all_loaded(&self) -> bool {
        Collection::ALL.iter().all(|c| self.is_loaded(*c))
    }

    /// Snapshot for status reporting.
    pub fn phases(&self) -> Vec<(Collection, CollectionPhase)> {
        Collection::ALL.iter().map(|c| (*c, self.phase(*c))).collect()
    }

    fn advance(
        &mut self,
        collection: Collection,
        from: CollectionPhase,
        to: CollectionPhase,
    ) -> bool {
        if self.phase(collection) != from {
            return false;
        }
        self.phases.insert(collection, to);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(Collection::Products), CollectionPhase::Default);

        assert!(!lifecycle.finish_load(Collection::Products));
        assert!(lifecycle.begin_load(Collection::Products));
        assert!(!lifecycle.begin_load(Collection::Products));
        assert!(!lifecycle.is_loaded(Collection::Products));

        assert!(lifecycle.finish_load(Collection::Products));
        assert!(lifecycle.is_loaded(Collection::Products));
        assert!(!lifecycle.is_loaded(Collection::Tables));
    }

    #[test]
    fn test_all_loaded() {
        let mut lifecycle = Lifecycle::new();
        for collection in Collection::ALL {
            lifecycle.begin_load(collection);
            assert!(!lifecycle.all_loaded());
            lifecycle.finish_load(collection);
        }
        assert!(lifecycle.all_loaded());
    }
}
