//! recall-store
//!
//! In-process implementation of the `VectorStore` collaborator: documents and
//! chunk vectors kept in memory behind a `RwLock`, written through staged
//! transactions, optionally persisted as a JSON snapshot.

pub mod memory;
pub mod snapshot;

pub use memory::{InMemoryStore, MemoryTransaction, StoredChunk};
