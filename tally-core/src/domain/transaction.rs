//! Transaction domain model

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::field::FROM_TO;
use super::template::{chrono_format, DEFAULT_DATE_FORMATS};

/// Direction of money flow, derived from the sign of the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    #[default]
    Debit,
}

impl TransactionType {
    /// `amount >= 0` is a credit, anything else a debit
    pub fn from_amount(amount: f64) -> Self {
        if amount >= 0.0 {
            TransactionType::Credit
        } else {
            TransactionType::Debit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" => Ok(TransactionType::Credit),
            "debit" => Ok(TransactionType::Debit),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// Value of a custom field
///
/// Imports only produce numbers and text; `Other` carries whatever else a
/// client stored through the API (`null`, booleans, nested JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Other(serde_json::Value::Null) => Ok(()),
            FieldValue::Other(value) => write!(f, "{}", value),
        }
    }
}

/// A single imported bank-statement line
///
/// The fixed core is always present; `extra` holds values of every other
/// mapped field (built-in `from/to`, `transaction_id` and custom fields),
/// flattened into the same JSON object on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            date: String::new(),
            description: String::new(),
            amount: 0.0,
            kind: TransactionType::Debit,
            extra: BTreeMap::new(),
        }
    }
}

impl Transaction {
    /// Create a transaction; the type follows the sign of `amount`
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            kind: TransactionType::from_amount(amount),
            extra: BTreeMap::new(),
        }
    }

    /// Set the amount and re-derive the type
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.kind = TransactionType::from_amount(amount);
    }

    pub fn with_extra(mut self, field_id: impl Into<String>, value: FieldValue) -> Self {
        self.extra.insert(field_id.into(), value);
        self
    }

    /// Counterpart label (`from/to`), if mapped and non-empty
    pub fn counterpart(&self) -> Option<String> {
        self.extra
            .get(FROM_TO)
            .map(|v| v.to_string())
            .filter(|s| !s.is_empty())
    }

    /// Best-effort calendar date
    ///
    /// Dates are stored verbatim from the CSV, so every suggested template
    /// format is tried in order, followed by an ISO date-time prefix.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Parse a statement date in any of the supported formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DEFAULT_DATE_FORMATS.iter().filter_map(|f| chrono_format(f)) {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_follows_sign() {
        assert_eq!(TransactionType::from_amount(0.0), TransactionType::Credit);
        assert_eq!(TransactionType::from_amount(-0.01), TransactionType::Debit);

        let mut tx = Transaction::new("2024-01-05", "Rent", -1234.56);
        assert_eq!(tx.kind, TransactionType::Debit);
        tx.set_amount(500.0);
        assert_eq!(tx.kind, TransactionType::Credit);
    }

    #[test]
    fn test_wire_format_flattens_extra_fields() {
        let tx = Transaction::new("2024-01-05", "Rent", -10.0)
            .with_extra("from/to", FieldValue::Text("Landlord".to_string()))
            .with_extra("fee_1", FieldValue::Number(1.5));

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "debit");
        assert_eq!(json["from/to"], "Landlord");
        assert_eq!(json["fee_1"], 1.5);

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_lenient_wire_values() {
        let json = serde_json::json!({
            "date": "2024-01-05",
            "description": "Rent",
            "fee": null,
            "flagged": true,
            "from/to": "Landlord"
        });
        let tx: Transaction = serde_json::from_value(json).unwrap();

        assert_eq!(tx.amount, 0.0);
        assert_eq!(tx.kind, TransactionType::Debit);
        assert_eq!(tx.extra.get("fee"), Some(&FieldValue::Other(serde_json::Value::Null)));
        assert_eq!(tx.extra.get("flagged"), Some(&FieldValue::Other(serde_json::Value::Bool(true))));
        assert_eq!(tx.counterpart().as_deref(), Some("Landlord"));

        let back = serde_json::to_value(&tx).unwrap();
        assert!(back["fee"].is_null());
        assert_eq!(back["flagged"], true);
    }

    #[test]
    fn test_counterpart() {
        let tx = Transaction::new("2024-01-05", "Rent", -10.0);
        assert_eq!(tx.counterpart(), None);
        let tx = tx.with_extra("from/to", FieldValue::Text("ACME".to_string()));
        assert_eq!(tx.counterpart().as_deref(), Some("ACME"));
    }

    #[test]
    fn test_parse_date_formats() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date("2024-01-05"), Some(jan5));
        assert_eq!(parse_date("05.01.2024"), Some(jan5));
        assert_eq!(parse_date("05-01-2024"), Some(jan5));
        // Day-first wins for slash dates
        assert_eq!(parse_date("05/01/2024"), Some(jan5));
        assert_eq!(parse_date("12/31/2024"), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(parse_date("2024-01-05T10:30:00Z"), Some(jan5));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }
}
