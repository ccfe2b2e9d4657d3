//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Process memory for BlobStore and TransactionStore
//! - Local filesystem (one JSON file per key) for BlobStore
//! - Any BlobStore for TransactionStore

pub mod blob_transactions;
pub mod file;
pub mod memory;

pub use blob_transactions::BlobTransactionStore;
pub use file::FileBlobStore;
pub use memory::{MemoryBlobStore, MemoryTransactionStore};
