//! Per-user reading history persistence.
//!
//! This crate provides:
//! - `HistoryStore` trait: read-all / replace-all keyed by username
//! - JSON-file and in-memory implementations
//! - `Ledger`: login, and classification wrapped in a per-user serialized
//!   read-modify-write

pub mod credentials;
pub mod error;
pub mod file;
pub mod ledger;
pub mod memory;
pub mod store;

pub use error::StorageError;
pub use file::FileStore;
pub use ledger::Ledger;
pub use memory::MemoryStore;
pub use store::{AccountDocument, HistoryStore};
