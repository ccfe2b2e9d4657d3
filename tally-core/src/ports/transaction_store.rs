//! Transaction store port - where finished imports are handed off

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::Transaction;

/// Storage for the current transaction batch
///
/// `save` is a full replace, not an append: concurrent saves race with
/// last-write-wins semantics.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Replace the stored batch
    async fn save(&self, transactions: Vec<Transaction>) -> Result<SaveReceipt>;

    /// Load the stored batch (empty if nothing was saved yet)
    async fn load(&self) -> Result<Vec<Transaction>>;
}

/// Acknowledgement of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub count: usize,
}
