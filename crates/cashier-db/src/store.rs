//! # Key-Value Store Seam
//!
//! The register persists each collection as one JSON document under its own
//! key. Anything that can `get` and `set` strings by key can back it.
//!
//! ```text
//! ┌──────────────────────┐      ┌───────────────────────────┐
//! │  Session (register)  │─────►│  dyn KeyValueStore        │
//! └──────────────────────┘      │  ├── KvRepository (SQLite)│
//!                               │  └── MemoryStore (tests)  │
//!                               └───────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};

/// Durable string storage addressed by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    fail_on_get: RwLock<bool>,
    fail_on_set: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MemoryStore {
            values: RwLock::new(values),
            ..Self::default()
        }
    }

    pub async fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.write().await = fail;
    }

    pub async fn set_fail_on_set(&self, fail: bool) {
        *self.fail_on_set.write().await = fail;
    }

    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        if *self.fail_on_get.read().await {
            return Err(DbError::QueryFailed(format!("read of '{key}' refused")));
        }
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        if *self.fail_on_set.read().await {
            return Err(DbError::QueryFailed(format!("write of '{key}' refused")));
        }
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
