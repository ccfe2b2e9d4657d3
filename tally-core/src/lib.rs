//! Tally Core - CSV bank-statement imports for personal finance
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Fields, templates, parsed CSV and transactions
//! - **ports**: Storage traits (BlobStore, TransactionStore)
//! - **services**: Parser, mapping engine, registries, import, charts
//! - **adapters**: Memory and file-backed stores

pub mod adapters;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{BlobTransactionStore, FileBlobStore, MemoryBlobStore, MemoryTransactionStore};
use config::{Config, StorageKind};
use ports::{BlobStore, TransactionStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, FormatError};
pub use domain::{
    ColumnMapping, CsvTemplate, Delimiter, FieldConfig, FieldType, FieldValue, NewField, ParsedCsv,
    TemplateFormData, Transaction, TransactionType,
};

/// Main context for Tally operations
///
/// Wires the configured storage into every service. Front-ends build one
/// context and share it.
pub struct TallyContext {
    pub config: Config,
    pub blobs: Arc<dyn BlobStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub field_registry: Arc<FieldRegistry>,
    pub template_store: Arc<TemplateStore>,
    pub import_service: ImportService,
    pub chart_service: ChartService,
}

impl TallyContext {
    /// Create a context from the settings in `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        let config = Config::load(dir).context("Failed to load settings")?;

        let (blobs, transactions): (Arc<dyn BlobStore>, Arc<dyn TransactionStore>) = match config.storage {
            StorageKind::File => {
                let blobs: Arc<dyn BlobStore> = Arc::new(
                    FileBlobStore::new(dir)
                        .with_context(|| format!("Failed to open data directory {}", dir.display()))?,
                );
                let transactions = Arc::new(BlobTransactionStore::new(Arc::clone(&blobs)));
                (blobs, transactions)
            }
            StorageKind::Memory => (Arc::new(MemoryBlobStore::new()), Arc::new(MemoryTransactionStore::new())),
        };

        tracing::debug!(dir = %dir.display(), storage = ?config.storage, "opened tally context");
        Ok(Self::with_stores(config, blobs, transactions))
    }

    /// Context backed entirely by process memory
    pub fn in_memory() -> Self {
        Self::with_stores(
            Config { storage: StorageKind::Memory, ..Config::default() },
            Arc::new(MemoryBlobStore::new()),
            Arc::new(MemoryTransactionStore::new()),
        )
    }

    pub fn with_stores(config: Config, blobs: Arc<dyn BlobStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        let field_registry = Arc::new(FieldRegistry::new(Arc::clone(&blobs)));
        let template_store = Arc::new(TemplateStore::new(Arc::clone(&blobs)));
        let import_service = ImportService::new(
            Arc::clone(&field_registry),
            Arc::clone(&template_store),
            Arc::clone(&transactions),
            config.default_delimiter,
        );
        let chart_service = ChartService::new(Arc::clone(&transactions));

        Self {
            config,
            blobs,
            transactions,
            field_registry,
            template_store,
            import_service,
            chart_service,
        }
    }
}
