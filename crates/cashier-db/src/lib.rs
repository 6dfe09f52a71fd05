//! # cashier-db: Durable Storage for Cashier POS
//!
//! Every register collection (products, tables, invoices, settings, ...) is
//! stored as one JSON record under its own key. This crate owns the SQLite
//! side of that: the pool, the schema, the key-value repository and the
//! ordered write queue the register uses to persist without blocking.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashier POS Data Flow                            │
//! │                                                                         │
//! │  Register session (mutation → dirty collections)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cashier-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │  WriteQueue   │    │ KeyValueStore │    │  Migrations  │   │   │
//! │  │   │  (writer.rs)  │───►│ KvRepository  │    │  (embedded)  │   │   │
//! │  │   │               │    │ MemoryStore   │    │              │   │   │
//! │  │   └───────────────┘    └───────┬───────┘    │ 001_kv_store │   │   │
//! │  │                                │            └──────────────┘   │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │   Database    │                       │   │
//! │  │                        │   (pool.rs)   │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (kv_store table)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`store`] - The `KeyValueStore` trait and `MemoryStore`
//! - [`repository`] - SQLite repositories
//! - [`writer`] - Fire-and-forget ordered writes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashier_db::{Database, DbConfig, WriteQueue};
//!
//! let db = Database::new(DbConfig::new("path/to/cashier.db")).await?;
//! let stored = db.kv().get("products").await?;
//!
//! let (writer, _task) = WriteQueue::spawn(Arc::new(db.kv()));
//! writer.enqueue("products", "[]")?;
//! writer.shutdown().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KvRepository;
pub use store::{KeyValueStore, MemoryStore};
pub use writer::{WriteQueue, WriteQueueHandle, WriteStats};
