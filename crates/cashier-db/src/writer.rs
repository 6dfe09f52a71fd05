//! # Write Queue
//!
//! Fire-and-forget persistence with per-key ordering.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Write Queue                                     │
//! │                                                                         │
//! │  Session mutation                                                      │
//! │       │  handle.enqueue("products", json)   (never blocks)             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  unbounded mpsc  (FIFO)                                         │   │
//! │  │  Put(products) ─ Put(tables) ─ Put(products) ─ Flush ─ ...      │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  WriteQueue::run  (single task)                                 │   │
//! │  │  store.set(key, value) one at a time, in submission order      │   │
//! │  │  failures: logged, counted, never retried                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A single consumer applying commands in channel order is what guarantees
//! that the last value enqueued for a key is the one left in storage.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};
use crate::store::KeyValueStore;

// =============================================================================
// Commands
// =============================================================================

enum WriteCommand {
    Put { key: String, value: String },
    Flush(oneshot::Sender<WriteStats>),
    Shutdown(oneshot::Sender<WriteStats>),
}

/// Counters reported by `flush` and `shutdown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub written: u64,
    pub failed: u64,
}

// =============================================================================
// Write Queue
// =============================================================================

/// Applies queued writes to a [`KeyValueStore`] in submission order.
pub struct WriteQueue {
    store: Arc<dyn KeyValueStore>,
    rx: mpsc::UnboundedReceiver<WriteCommand>,
    stats: WriteStats,
}

/// Handle for submitting writes to the queue.
#[derive(Debug, Clone)]
pub struct WriteQueueHandle {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl WriteQueueHandle {
    /// Queues `value` to be stored under `key`. Returns immediately.
    pub fn enqueue(&self, key: impl Into<String>, value: impl Into<String>) -> DbResult<()> {
        self.tx
            .send(WriteCommand::Put {
                key: key.into(),
                value: value.into(),
            })
            .map_err(|_| DbError::WriterClosed)
    }

    /// Waits until every write queued before this call has been applied.
    pub async fn flush(&self) -> DbResult<WriteStats> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Flush(tx))
            .map_err(|_| DbError::WriterClosed)?;
        rx.await.map_err(|_| DbError::WriterClosed)
    }

    /// Applies everything already queued, then stops the queue task.
    pub async fn shutdown(&self) -> DbResult<WriteStats> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Shutdown(tx))
            .map_err(|_| DbError::WriterClosed)?;
        rx.await.map_err(|_| DbError::WriterClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl WriteQueue {
    /// Creates a new write queue and returns a handle.
    pub fn new(store: Arc<dyn KeyValueStore>) -> (Self, WriteQueueHandle) {
        let (tx, rx) = mpsc::unbounded_channel();

        let queue = WriteQueue {
            store,
            rx,
            stats: WriteStats::default(),
        };

        (queue, WriteQueueHandle { tx })
    }

    /// Creates the queue and spawns it on the current runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> (WriteQueueHandle, JoinHandle<WriteStats>) {
        let (queue, handle) = WriteQueue::new(store);
        let task = tokio::spawn(queue.run());
        (handle, task)
    }

    /// Runs the queue loop until shutdown or until every handle is dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) -> WriteStats {
        info!("Write queue starting");

        while let Some(command) = self.rx.recv().await {
            match command {
                WriteCommand::Put { key, value } => self.apply(&key, &value).await,
                WriteCommand::Flush(reply) => {
                    debug!(written = self.stats.written, "Write queue flushed");
                    let _ = reply.send(self.stats);
                }
                WriteCommand::Shutdown(reply) => {
                    info!("Write queue shutting down");
                    let _ = reply.send(self.stats);
                    break;
                }
            }
        }

        info!(
            written = self.stats.written,
            failed = self.stats.failed,
            "Write queue stopped"
        );
        self.stats
    }

    async fn apply(&mut self, key: &str, value: &str) {
        match self.store.set(key, value).await {
            Ok(()) => {
                self.stats.written += 1;
                debug!(key = %key, "Record persisted");
            }
            Err(e) => {
                self.stats.failed += 1;
                error!(key = %key, error = %e, "Failed to persist record");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_last_write_per_key_wins() {
        let store = Arc::new(MemoryStore::new());
        let (handle, _task) = WriteQueue::spawn(store.clone());

        for n in 0..50 {
            handle.enqueue("products", format!("[{n}]")).unwrap();
            handle.enqueue("tables", format!("[{}]", n * 2)).unwrap();
        }
        let stats = handle.flush().await.unwrap();

        assert_eq!(stats.written, 100);
        assert_eq!(store.get("products").await.unwrap().as_deref(), Some("[49]"));
        assert_eq!(store.get("tables").await.unwrap().as_deref(), Some("[98]"));
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_fatal() {
        let store = Arc::new(MemoryStore::new());
        let (handle, _task) = WriteQueue::spawn(store.clone());

        store.set_fail_on_set(true).await;
        handle.enqueue("invoices", "[]").unwrap();
        handle.flush().await.unwrap();

        store.set_fail_on_set(false).await;
        handle.enqueue("invoices", "[1]").unwrap();
        let stats = handle.flush().await.unwrap();

        assert_eq!(stats, WriteStats { written: 1, failed: 1 });
        assert_eq!(store.get("invoices").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_shutdown_drains_then_closes() {
        let store = Arc::new(MemoryStore::new());
        let (handle, task) = WriteQueue::spawn(store.clone());

        handle.enqueue("settings", "{}").unwrap();
        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.written, 1);

        assert_eq!(task.await.unwrap().written, 1);
        assert!(matches!(handle.enqueue("settings", "{}"), Err(DbError::WriterClosed)));
        assert!(matches!(handle.flush().await, Err(DbError::WriterClosed)));
    }

    #[tokio::test]
    async fn test_writes_reach_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (handle, _task) = WriteQueue::spawn(Arc::new(db.kv()));

        handle.enqueue("categories", r#"["Drinks"]"#).unwrap();
        handle.flush().await.unwrap();

        assert_eq!(
            db.kv().get("categories").await.unwrap().as_deref(),
            Some(r#"["Drinks"]"#)
        );
    }
}
