//! Template store - named, reusable CSV import configurations

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{CsvTemplate, TemplateFormData};
use crate::ports::{BlobStore, TEMPLATES_KEY};

/// CRUD over templates persisted under `csv_templates`
pub struct TemplateStore {
    blobs: Arc<dyn BlobStore>,
}

impl TemplateStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// All templates in storage order
    ///
    /// A corrupt blob reads as an empty collection.
    pub fn list(&self) -> Result<Vec<CsvTemplate>> {
        let Some(content) = self.blobs.get(TEMPLATES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&content) {
            Ok(templates) => Ok(templates),
            Err(e) => {
                tracing::warn!(error = %e, "stored templates unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<CsvTemplate>> {
        Ok(self.list()?.into_iter().find(|t| t.id == id))
    }

    /// Create and persist a template; both timestamps are set to now
    pub fn create(&self, form: TemplateFormData) -> Result<CsvTemplate> {
        validate(&form)?;

        let mut templates = self.list()?;
        let now = Utc::now();

        let mut millis = now.timestamp_millis();
        let mut id = generate_template_id(&form.name, millis);
        while templates.iter().any(|t| t.id == id) {
            millis += 1;
            id = generate_template_id(&form.name, millis);
        }

        let timestamp = iso_timestamp(now);
        let template = CsvTemplate {
            id,
            name: form.name,
            description: form.description,
            delimiter: form.delimiter,
            date_format: form.date_format,
            column_mappings: form.column_mappings,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        templates.push(template.clone());
        self.save(&templates)?;
        tracing::info!(template_id = %template.id, "created template");

        Ok(template)
    }

    /// Replace a template's editable fields
    ///
    /// `id` and `created_at` are kept, `updated_at` is refreshed.
    pub fn update(&self, id: &str, form: TemplateFormData) -> Result<CsvTemplate> {
        validate(&form)?;

        let mut templates = self.list()?;
        let existing = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found(format!("Template {}", id)))?;

        existing.name = form.name;
        existing.description = form.description;
        existing.delimiter = form.delimiter;
        existing.date_format = form.date_format;
        existing.column_mappings = form.column_mappings;
        existing.updated_at = iso_timestamp(Utc::now());

        let updated = existing.clone();
        self.save(&templates)?;
        tracing::info!(template_id = %id, "updated template");

        Ok(updated)
    }

    /// Delete a template; returns whether anything was removed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut templates = self.list()?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(false);
        }

        self.save(&templates)?;
        tracing::info!(template_id = %id, "deleted template");
        Ok(true)
    }

    fn save(&self, templates: &[CsvTemplate]) -> Result<()> {
        let content = serde_json::to_string_pretty(templates)?;
        self.blobs.put(TEMPLATES_KEY, &content)
    }
}

fn validate(form: &TemplateFormData) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(Error::validation("Template name is required"));
    }
    Ok(())
}

/// `My Bank` at `1700000000000` becomes `template_my_bank_1700000000000`
pub fn generate_template_id(name: &str, millis: i64) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"));

    format!("template_{}_{}", re.replace_all(&name.to_lowercase(), "_"), millis)
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-05T10:00:00.000Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
