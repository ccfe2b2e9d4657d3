//! CSV templates - reusable delimiter + date format + column mapping bundles

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Date formats offered when creating a template
pub const DEFAULT_DATE_FORMATS: [&str; 5] = [
    "YYYY-MM-DD",
    "DD/MM/YYYY",
    "MM/DD/YYYY",
    "DD.MM.YYYY",
    "DD-MM-YYYY",
];

/// Translate a template date format into a chrono format string
pub fn chrono_format(date_format: &str) -> Option<&'static str> {
    match date_format {
        "YYYY-MM-DD" => Some("%Y-%m-%d"),
        "DD/MM/YYYY" => Some("%d/%m/%Y"),
        "MM/DD/YYYY" => Some("%m/%d/%Y"),
        "DD.MM.YYYY" => Some("%d.%m.%Y"),
        "DD-MM-YYYY" => Some("%d-%m-%Y"),
        _ => None,
    }
}

/// Supported cell separators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delimiter {
    #[serde(rename = ",")]
    Comma,
    #[default]
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = "\t")]
    Tab,
    #[serde(rename = "|")]
    Pipe,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Delimiter::Comma => "Comma (,)",
            Delimiter::Semicolon => "Semicolon (;)",
            Delimiter::Tab => "Tab",
            Delimiter::Pipe => "Pipe (|)",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "," | "comma" => Ok(Delimiter::Comma),
            ";" | "semicolon" => Ok(Delimiter::Semicolon),
            "\t" | "\\t" | "tab" => Ok(Delimiter::Tab),
            "|" | "pipe" => Ok(Delimiter::Pipe),
            other => Err(format!("Unsupported delimiter: {:?}", other)),
        }
    }
}

/// Field id -> CSV header name
///
/// An absent entry or an empty header name both mean "unmapped".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header mapped to `field_id`, if any
    pub fn column_for(&self, field_id: &str) -> Option<&str> {
        self.0
            .get(field_id)
            .map(String::as_str)
            .filter(|column| !column.is_empty())
    }

    pub fn set(&mut self, field_id: impl Into<String>, column: impl Into<String>) {
        self.0.insert(field_id.into(), column.into());
    }

    pub fn unset(&mut self, field_id: &str) {
        self.0.remove(field_id);
    }

    /// Mapped (field id, header) pairs, skipping empty entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, column)| !column.is_empty())
            .map(|(field, column)| (field.as_str(), column.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A saved import template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub date_format: String,
    #[serde(default)]
    pub column_mappings: ColumnMapping,
    /// ISO-8601 creation time, never changes after create
    pub created_at: String,
    pub updated_at: String,
}

/// Editable part of a template, as submitted by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub date_format: String,
    #[serde(default)]
    pub column_mappings: ColumnMapping,
}

impl CsvTemplate {
    /// Editable part of this template
    pub fn form_data(&self) -> TemplateFormData {
        TemplateFormData {
            name: self.name.clone(),
            description: self.description.clone(),
            delimiter: self.delimiter,
            date_format: self.date_format.clone(),
            column_mappings: self.column_mappings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_wire_format() {
        assert_eq!(serde_json::to_string(&Delimiter::Tab).unwrap(), r#""\t""#);
        let d: Delimiter = serde_json::from_str(r#""|""#).unwrap();
        assert_eq!(d, Delimiter::Pipe);
        assert!(serde_json::from_str::<Delimiter>(r##""#""##).is_err());
    }

    #[test]
    fn test_delimiter_from_str() {
        assert_eq!("tab".parse::<Delimiter>().unwrap().as_char(), '\t');
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Semicolon);
        assert!("#".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_column_mapping_treats_empty_as_unmapped() {
        let mut mapping: ColumnMapping = [("date", "Datum"), ("amount", "")].into_iter().collect();
        assert_eq!(mapping.column_for("date"), Some("Datum"));
        assert_eq!(mapping.column_for("amount"), None);
        assert_eq!(mapping.column_for("description"), None);
        assert_eq!(mapping.iter().count(), 1);

        mapping.unset("date");
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_template_wire_format() {
        let json = r#"{
            "id": "template_giro_1700000000000",
            "name": "Giro",
            "description": "",
            "delimiter": ";",
            "dateFormat": "DD.MM.YYYY",
            "columnMappings": {"date": "Buchungstag", "amount": "Betrag"},
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let template: CsvTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.delimiter, Delimiter::Semicolon);
        assert_eq!(template.column_mappings.column_for("amount"), Some("Betrag"));
        assert_eq!(chrono_format(&template.date_format), Some("%d.%m.%Y"));
    }
}
