//! Importable field definitions

use serde::{Deserialize, Serialize};

/// Field id of the transaction date
pub const DATE: &str = "date";
/// Field id of the counterpart ("From/To") label
pub const FROM_TO: &str = "from/to";
/// Field id of the bank's transaction reference
pub const TRANSACTION_ID: &str = "transaction_id";
/// Field id of the free-text description
pub const DESCRIPTION: &str = "description";
/// Field id of the signed amount
pub const AMOUNT: &str = "amount";

/// Semantic type of a field, drives coercion in the mapping engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Date => "date",
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "text" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            other => Err(format!("Unknown field type: {}", other)),
        }
    }
}

/// A named, typed attribute a transaction may carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
}

impl FieldConfig {
    fn builtin(id: &str, name: &str, field_type: FieldType, required: bool, description: &str, is_default: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            field_type,
            required,
            description: description.to_string(),
            is_default,
        }
    }
}

/// Built-in fields, in display order
///
/// `transaction_id` is shipped with the built-ins but flagged non-default;
/// it is still protected from removal because it belongs to this list.
pub fn builtin_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::builtin(DATE, "Date", FieldType::Date, true, "Transaction date", true),
        FieldConfig::builtin(FROM_TO, "From/To", FieldType::String, true, "From/To", true),
        FieldConfig::builtin(TRANSACTION_ID, "Transaction ID", FieldType::String, false, "Transaction ID", false),
        FieldConfig::builtin(DESCRIPTION, "Description", FieldType::String, true, "Transaction description or details", true),
        FieldConfig::builtin(AMOUNT, "Amount", FieldType::Number, true, "Transaction amount", true),
    ]
}

/// Whether `id` names one of the built-in fields
pub fn is_builtin(id: &str) -> bool {
    matches!(id, DATE | FROM_TO | TRANSACTION_ID | DESCRIPTION | AMOUNT)
}

/// User input for a new custom field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewField {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_membership() {
        let ids: Vec<String> = builtin_fields().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["date", "from/to", "transaction_id", "description", "amount"]);
        assert!(ids.iter().all(|id| is_builtin(id)));
        assert!(!is_builtin("iban"));
    }

    #[test]
    fn test_field_config_wire_format() {
        let json = r#"{"id":"iban_1","name":"IBAN","type":"string","required":false,"description":"","isDefault":false}"#;
        let field: FieldConfig = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.is_default);

        let out = serde_json::to_value(&field).unwrap();
        assert_eq!(out["type"], "string");
        assert_eq!(out["isDefault"], false);
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("Number".parse::<FieldType>().unwrap(), FieldType::Number);
        assert_eq!("text".parse::<FieldType>().unwrap(), FieldType::String);
        assert!("money".parse::<FieldType>().is_err());
    }
}
