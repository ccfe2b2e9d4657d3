//! Field registry - built-in plus user-defined importable fields

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use chrono::Utc;
use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{builtin_fields, is_builtin, FieldConfig, NewField};
use crate::ports::{BlobStore, FIELD_CONFIG_KEY};

/// Registry of importable fields, persisted under `csv-field-config`
pub struct FieldRegistry {
    blobs: Arc<dyn BlobStore>,
}

impl FieldRegistry {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// All fields: built-ins in fixed order, then custom fields in storage order
    pub fn list_fields(&self) -> Result<Vec<FieldConfig>> {
        let mut fields = builtin_fields();
        fields.extend(self.custom_fields()?);
        Ok(fields)
    }

    /// Look up a single field by id
    pub fn get(&self, id: &str) -> Result<Option<FieldConfig>> {
        Ok(self.list_fields()?.into_iter().find(|f| f.id == id))
    }

    /// Register a custom field
    ///
    /// The id is derived from the name and the current time; if that id is
    /// already taken the time suffix is bumped until it is unique.
    pub fn add_field(&self, candidate: NewField) -> Result<FieldConfig> {
        let name = candidate.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Field name is required"));
        }

        let mut fields = self.list_fields()?;
        let taken: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();

        let mut millis = Utc::now().timestamp_millis();
        let mut id = generate_field_id(name, millis);
        while taken.contains(id.as_str()) {
            millis += 1;
            id = generate_field_id(name, millis);
        }

        let field = FieldConfig {
            id,
            name: name.to_string(),
            field_type: candidate.field_type,
            required: candidate.required,
            description: candidate.description,
            is_default: false,
        };

        fields.push(field.clone());
        self.save(&fields)?;
        tracing::info!(field_id = %field.id, "added custom field");

        Ok(field)
    }

    /// Remove a custom field
    ///
    /// Built-in ids are rejected; unknown ids are a no-op. Returns whether a
    /// field was removed.
    pub fn remove_field(&self, id: &str) -> Result<bool> {
        if is_builtin(id) {
            return Err(Error::validation(format!("Built-in field '{}' cannot be removed", id)));
        }

        let mut fields = self.list_fields()?;
        let before = fields.len();
        fields.retain(|f| f.id != id);
        if fields.len() == before {
            return Ok(false);
        }

        self.save(&fields)?;
        tracing::info!(field_id = %id, "removed custom field");
        Ok(true)
    }

    /// Persisted custom fields, reconciled against the built-ins
    ///
    /// Entries colliding with a built-in id (or an earlier entry) are
    /// dropped. A missing or unreadable blob yields no custom fields.
    fn custom_fields(&self) -> Result<Vec<FieldConfig>> {
        let Some(content) = self.blobs.get(FIELD_CONFIG_KEY)? else {
            return Ok(Vec::new());
        };

        let stored: Vec<FieldConfig> = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "stored field config unreadable, using defaults");
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        Ok(stored
            .into_iter()
            .filter(|f| !is_builtin(&f.id) && seen.insert(f.id.clone()))
            .collect())
    }

    fn save(&self, fields: &[FieldConfig]) -> Result<()> {
        let content = serde_json::to_string_pretty(fields)?;
        self.blobs.put(FIELD_CONFIG_KEY, &content)
    }
}

/// `Fee (EUR)` at `1700000000000` becomes `fee__eur__1700000000000`
pub fn generate_field_id(name: &str, millis: i64) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]").expect("valid slug regex"));

    format!("{}_{}", re.replace_all(&name.to_lowercase(), "_"), millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryBlobStore;
    use crate::domain::FieldType;

    fn registry() -> (FieldRegistry, Arc<dyn BlobStore>) {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        (FieldRegistry::new(Arc::clone(&blobs)), blobs)
    }

    fn new_field(name: &str, field_type: FieldType) -> NewField {
        NewField {
            name: name.to_string(),
            field_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store_lists_builtins() {
        let (registry, _) = registry();
        assert_eq!(registry.list_fields().unwrap(), builtin_fields());
    }

    #[test]
    fn test_add_field_appends_after_builtins() {
        let (registry, _) = registry();
        let fee = registry.add_field(new_field("Fee (EUR)", FieldType::Number)).unwrap();
        let note = registry.add_field(new_field("Note", FieldType::String)).unwrap();

        assert!(fee.id.starts_with("fee__eur__"));
        assert!(!fee.is_default);

        let fields = registry.list_fields().unwrap();
        assert_eq!(fields.len(), builtin_fields().len() + 2);
        assert_eq!(fields[fields.len() - 2].id, fee.id);
        assert_eq!(fields[fields.len() - 1].id, note.id);
    }

    #[test]
    fn test_repeated_names_get_unique_ids() {
        let (registry, _) = registry();
        let a = registry.add_field(new_field("IBAN", FieldType::String)).unwrap();
        let b = registry.add_field(new_field("IBAN", FieldType::String)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_field_requires_name() {
        let (registry, _) = registry();
        let err = registry.add_field(new_field("   ", FieldType::String)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(registry.list_fields().unwrap().len(), builtin_fields().len());
    }

    #[test]
    fn test_builtin_fields_cannot_be_removed() {
        let (registry, _) = registry();
        for id in ["amount", "transaction_id"] {
            assert!(matches!(registry.remove_field(id), Err(Error::Validation(_))));
            assert!(registry.get(id).unwrap().is_some());
        }
    }

    #[test]
    fn test_remove_custom_field() {
        let (registry, _) = registry();
        let fee = registry.add_field(new_field("Fee", FieldType::Number)).unwrap();

        assert!(registry.remove_field(&fee.id).unwrap());
        assert!(!registry.remove_field(&fee.id).unwrap());
        assert_eq!(registry.list_fields().unwrap(), builtin_fields());
    }

    #[test]
    fn test_corrupt_blob_yields_builtins() {
        let (registry, blobs) = registry();
        registry.add_field(new_field("Fee", FieldType::Number)).unwrap();
        blobs.put(FIELD_CONFIG_KEY, "[{\"id\": ").unwrap();

        assert_eq!(registry.list_fields().unwrap(), builtin_fields());
    }

    #[test]
    fn test_stale_blob_is_reconciled() {
        let (registry, blobs) = registry();
        // An old save that overrode `amount` and lacks every other built-in
        let stale = r#"[
            {"id": "amount", "name": "Betrag", "type": "string", "required": false, "description": "", "isDefault": false},
            {"id": "iban_1", "name": "IBAN", "type": "string", "required": false, "description": "", "isDefault": false},
            {"id": "iban_1", "name": "IBAN copy", "type": "string", "required": false, "description": "", "isDefault": false}
        ]"#;
        blobs.put(FIELD_CONFIG_KEY, stale).unwrap();

        let fields = registry.list_fields().unwrap();
        let ids: Vec<&str> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["date", "from/to", "transaction_id", "description", "amount", "iban_1"]);
        assert_eq!(fields[4].name, "Amount");
        assert_eq!(fields[5].name, "IBAN");
    }

    #[test]
    fn test_generate_field_id() {
        assert_eq!(generate_field_id("Fee (EUR)", 1700000000000), "fee__eur__1700000000000");
        assert_eq!(generate_field_id("Kategorie", 1), "kategorie_1");
    }
}
