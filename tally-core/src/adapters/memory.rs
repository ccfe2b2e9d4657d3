//! In-process stores
//!
//! Used by the `memory` storage mode and by tests. Contents
//! are lost when the process exits.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::Transaction;
use crate::ports::{BlobStore, SaveReceipt, TransactionStore};

/// Blob store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.lock().map_err(|_| Error::storage("blob store lock poisoned"))?;
        Ok(blobs.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.lock().map_err(|_| Error::storage("blob store lock poisoned"))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Transaction store holding the last saved batch in memory
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn save(&self, transactions: Vec<Transaction>) -> Result<SaveReceipt> {
        let count = transactions.len();
        let mut stored = self
            .transactions
            .write()
            .map_err(|_| Error::storage("transaction store lock poisoned"))?;
        *stored = transactions;
        Ok(SaveReceipt { count })
    }

    async fn load(&self) -> Result<Vec<Transaction>> {
        let stored = self
            .transactions
            .read()
            .map_err(|_| Error::storage("transaction store lock poisoned"))?;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_put_replaces() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.put("k", "[1]").unwrap();
        store.put("k", "[2]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_batch() {
        let store = MemoryTransactionStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let first = vec![
            Transaction::new("2024-01-01", "a", 1.0),
            Transaction::new("2024-01-02", "b", -2.0),
        ];
        assert_eq!(store.save(first).await.unwrap().count, 2);

        let second = vec![Transaction::new("2024-02-01", "c", 3.0)];
        assert_eq!(store.save(second.clone()).await.unwrap().count, 1);
        assert_eq!(store.load().await.unwrap(), second);
    }
}
