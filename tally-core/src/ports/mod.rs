//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod blob_store;
mod transaction_store;

pub use blob_store::{BlobStore, FIELD_CONFIG_KEY, TEMPLATES_KEY, TRANSACTIONS_KEY};
pub use transaction_store::{SaveReceipt, TransactionStore};
