//! Blob store port - key-value persistence for configuration

use crate::domain::result::Result;

/// Key of the persisted field registry (JSON array of `FieldConfig`)
pub const FIELD_CONFIG_KEY: &str = "csv-field-config";
/// Key of the persisted templates (JSON array of `CsvTemplate`)
pub const TEMPLATES_KEY: &str = "csv_templates";
/// Key of the persisted transaction batch (JSON array of `Transaction`)
pub const TRANSACTIONS_KEY: &str = "bank-statements";

/// Key-value blob storage, one opaque string per key
///
/// Callers own the encoding; the store never inspects blob contents.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn put(&self, key: &str, value: &str) -> Result<()>;
}
