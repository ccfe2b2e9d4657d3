//! Import service - CSV text to stored transactions

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::field::{AMOUNT, DATE, DESCRIPTION, FROM_TO, TRANSACTION_ID};
use crate::domain::result::{Error, Result};
use crate::domain::{ColumnMapping, Delimiter, ParsedCsv, Transaction};
use crate::ports::TransactionStore;
use crate::services::{csv, mapping, FieldRegistry, TemplateStore};

/// What to import and how to map it
///
/// With a template, its delimiter and mapping are the starting point and
/// any explicit `delimiter` / `mapping` entries override them. Without
/// either a template or a mapping, columns are auto-detected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Raw file text
    pub csv: String,
    #[serde(default)]
    pub delimiter: Option<Delimiter>,
    #[serde(default)]
    pub mapping: Option<ColumnMapping>,
    #[serde(default)]
    pub template_id: Option<String>,
}

/// Import service for CSV imports
pub struct ImportService {
    fields: Arc<FieldRegistry>,
    templates: Arc<TemplateStore>,
    store: Arc<dyn TransactionStore>,
    default_delimiter: Delimiter,
}

impl ImportService {
    pub fn new(
        fields: Arc<FieldRegistry>,
        templates: Arc<TemplateStore>,
        store: Arc<dyn TransactionStore>,
        default_delimiter: Delimiter,
    ) -> Self {
        Self { fields, templates, store, default_delimiter }
    }

    /// Parse and map without saving
    pub fn preview(&self, request: &ImportRequest) -> Result<ImportResult> {
        let (transactions, mut result) = self.prepare(request)?;
        result.preview = true;
        result.transactions = Some(transactions);
        Ok(result)
    }

    /// Parse, map and replace the stored batch
    pub async fn import(&self, request: &ImportRequest) -> Result<ImportResult> {
        let (transactions, result) = self.prepare(request)?;
        let receipt = self.store.save(transactions).await?;
        tracing::info!(
            batch_id = %result.batch_id,
            imported = receipt.count,
            skipped = result.skipped,
            "import complete"
        );
        Ok(ImportResult { imported: receipt.count, ..result })
    }

    fn prepare(&self, request: &ImportRequest) -> Result<(Vec<Transaction>, ImportResult)> {
        let template = match &request.template_id {
            Some(id) => Some(
                self.templates
                    .get(id)?
                    .ok_or_else(|| Error::not_found(format!("Template {}", id)))?,
            ),
            None => None,
        };

        let delimiter = request
            .delimiter
            .or(template.as_ref().map(|t| t.delimiter))
            .unwrap_or(self.default_delimiter);

        let parsed = csv::parse_file(&request.csv, delimiter.as_char())?;

        let mut column_mapping = match (&template, &request.mapping) {
            (Some(t), _) => t.column_mappings.clone(),
            (None, Some(m)) => m.clone(),
            (None, None) => detect_columns(&parsed.headers),
        };
        if let (Some(_), Some(overrides)) = (&template, &request.mapping) {
            for (field, column) in overrides.iter() {
                column_mapping.set(field, column);
            }
        }

        let fields = self.fields.list_fields()?;
        let transactions = mapping::map(&parsed, &fields, &column_mapping);

        let result = ImportResult {
            batch_id: format!("import_{}", Utc::now().format("%Y%m%d_%H%M%S")),
            discovered: parsed.row_count(),
            imported: transactions.len(),
            skipped: parsed.row_count() - transactions.len(),
            preview: false,
            template_id: template.map(|t| t.id),
            headers: parsed.headers.clone(),
            mapping: column_mapping,
            transactions: None,
        };

        Ok((transactions, result))
    }

    /// Parse file text with an explicit delimiter
    pub fn parse(&self, text: &str, delimiter: Delimiter) -> Result<ParsedCsv> {
        csv::parse_file(text, delimiter.as_char())
    }
}

/// Best-guess mapping from header names
///
/// Patterns are matched case-insensitively as substrings, in field order
/// date, amount, description, from/to, transaction id. A header is never
/// assigned to two fields.
pub fn detect_columns(headers: &[String]) -> ColumnMapping {
    let date_patterns = ["date", "datum", "buchungstag", "valuta", "posted"];
    let amount_patterns = ["amount", "amt", "betrag", "umsatz", "total"];
    let desc_patterns = ["description", "desc", "memo", "details", "narration", "verwendungszweck", "text"];
    let from_to_patterns = ["from/to", "payee", "merchant", "counterparty", "beneficiary", "empfänger", "empfaenger", "auftraggeber", "name"];
    let id_patterns = ["transaction id", "transaction_id", "reference", "referenz"];

    let rules: [(&str, &[&str]); 5] = [
        (DATE, &date_patterns),
        (AMOUNT, &amount_patterns),
        (DESCRIPTION, &desc_patterns),
        (FROM_TO, &from_to_patterns),
        (TRANSACTION_ID, &id_patterns),
    ];

    let mut detected = ColumnMapping::new();
    let mut used: Vec<&str> = Vec::new();

    for (field_id, patterns) in rules {
        let found = headers.iter().find(|header| {
            let header_lower = header.to_lowercase();
            !used.contains(&header.as_str()) && patterns.iter().any(|p| header_lower.contains(p))
        });
        if let Some(header) = found {
            detected.set(field_id, header.clone());
            used.push(header);
        }
    }

    detected
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Unique batch ID for this import
    pub batch_id: String,
    /// Data rows that survived parsing
    pub discovered: usize,
    /// Transactions produced (and saved, unless previewing)
    pub imported: usize,
    /// Rows dropped because their amount did not parse
    pub skipped: usize,
    /// Whether this was a preview (nothing saved)
    pub preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub headers: Vec<String>,
    /// Mapping actually applied
    pub mapping: ColumnMapping,
    /// Mapped transactions (only in preview mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}
