//! Transaction store persisted through a `BlobStore`

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Transaction;
use crate::ports::{BlobStore, SaveReceipt, TransactionStore, TRANSACTIONS_KEY};

/// Stores the batch as a JSON array under `bank-statements`
pub struct BlobTransactionStore {
    blobs: Arc<dyn BlobStore>,
}

impl BlobTransactionStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl TransactionStore for BlobTransactionStore {
    async fn save(&self, transactions: Vec<Transaction>) -> Result<SaveReceipt> {
        let content = serde_json::to_string_pretty(&transactions)?;
        self.blobs.put(TRANSACTIONS_KEY, &content)?;
        tracing::info!(count = transactions.len(), "saved transaction batch");
        Ok(SaveReceipt { count: transactions.len() })
    }

    async fn load(&self) -> Result<Vec<Transaction>> {
        let Some(content) = self.blobs.get(TRANSACTIONS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&content) {
            Ok(transactions) => Ok(transactions),
            Err(e) => {
                tracing::warn!(error = %e, "stored transactions unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBlobStore;
    use crate::domain::FieldValue;

    #[tokio::test]
    async fn test_roundtrip_through_blob() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let store = BlobTransactionStore::new(Arc::clone(&blobs));

        let batch = vec![Transaction::new("2024-03-01", "Salary", 2500.0)
            .with_extra("from/to", FieldValue::Text("Employer".to_string()))];
        store.save(batch.clone()).await.unwrap();

        assert!(blobs.get(TRANSACTIONS_KEY).unwrap().is_some());
        assert_eq!(store.load().await.unwrap(), batch);
    }

    #[tokio::test]
    async fn test_non_finite_extra_survives_reload() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let store = BlobTransactionStore::new(blobs);

        let batch = vec![
            Transaction::new("2024-03-01", "Fee", -1.0).with_extra("fee_1", FieldValue::Number(f64::INFINITY)),
            Transaction::new("2024-03-02", "Coffee", -3.2),
        ];
        assert_eq!(store.save(batch).await.unwrap().count, 2);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].extra.get("fee_1"), Some(&FieldValue::Other(serde_json::Value::Null)));
    }

    #[tokio::test]
    async fn test_corrupt_blob_loads_empty() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        blobs.put(TRANSACTIONS_KEY, "{not json").unwrap();

        let store = BlobTransactionStore::new(blobs);
        assert!(store.load().await.unwrap().is_empty());
    }
}
