//! Mapping engine - turns parsed CSV rows into transactions
//!
//! Processing is driven by the field registry: every field with a mapped,
//! existing column contributes to each row, so custom fields need no code.
//! The amount is the only load-bearing value; a row whose amount does not
//! coerce to a finite number is dropped, everything else degrades to empty.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::field::{AMOUNT, DATE, DESCRIPTION};
use crate::domain::{ColumnMapping, CsvTemplate, FieldConfig, FieldType, FieldValue, ParsedCsv, Transaction};

/// Map every row of `parsed` through `mapping`
///
/// Pure: the same inputs always produce the same output.
pub fn map(parsed: &ParsedCsv, fields: &[FieldConfig], mapping: &ColumnMapping) -> Vec<Transaction> {
    // Resolve columns once; unmapped fields and unknown headers drop out here
    let columns: Vec<(&FieldConfig, usize)> = fields
        .iter()
        .filter_map(|field| {
            let column = mapping.column_for(&field.id)?;
            parsed.column_index(column).map(|index| (field, index))
        })
        .collect();

    let transactions: Vec<Transaction> = parsed
        .rows
        .iter()
        .map(|row| map_row(row, &columns))
        .filter(|tx| tx.amount.is_finite())
        .collect();

    tracing::debug!(
        rows = parsed.rows.len(),
        mapped_fields = columns.len(),
        transactions = transactions.len(),
        "mapped rows"
    );

    transactions
}

/// Same as [`map`], with the mapping taken from `template`
pub fn map_with_template(parsed: &ParsedCsv, fields: &[FieldConfig], template: &CsvTemplate) -> Vec<Transaction> {
    map(parsed, fields, &template.column_mappings)
}

fn map_row(row: &[String], columns: &[(&FieldConfig, usize)]) -> Transaction {
    let mut tx = Transaction::default();

    for (field, index) in columns {
        let value = row.get(*index).map(|cell| cell.trim()).unwrap_or("");

        match field.id.as_str() {
            AMOUNT => tx.set_amount(parse_amount(value)),
            DATE => tx.date = value.to_string(),
            DESCRIPTION => tx.description = value.to_string(),
            _ if field.field_type == FieldType::Number => {
                if let Some(number) = parse_decimal_comma(value).filter(|n| n.is_finite()) {
                    tx.extra.insert(field.id.clone(), FieldValue::Number(number));
                }
            }
            _ => {
                tx.extra.insert(field.id.clone(), FieldValue::Text(value.to_string()));
            }
        }
    }

    tx
}

/// Coerce a European-formatted amount (`1.234,56`) to a float
///
/// Whitespace and `.` thousands separators are removed and `,` becomes the
/// decimal point. Returns NaN when nothing numeric remains.
pub fn parse_amount(raw: &str) -> f64 {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    parse_float_prefix(&normalized).unwrap_or(f64::NAN)
}

/// Coerce a custom numeric cell, first `,` read as the decimal point
pub fn parse_decimal_comma(raw: &str) -> Option<f64> {
    parse_float_prefix(&raw.replacen(',', ".", 1))
}

/// Parse the longest leading float literal, ignoring trailing text
///
/// `"12.5 EUR"` is 12.5, `"EUR 12.5"` is not a number.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = FLOAT_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
    });

    re.find(s.trim_start()).and_then(|m| m.as_str().parse::<f64>().ok())
}
