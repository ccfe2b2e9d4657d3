//! CSV row parser
//!
//! Bank exports are split on the literal delimiter. Quoting is cosmetic
//! only: the reader runs with quoting disabled, so a delimiter inside a
//! quoted cell still splits the cell and doubled quotes are not unescaped.
//! Only the outer quote pair of each cell is stripped.

use csv::{ReaderBuilder, Trim};

use crate::domain::result::{FormatError, Result};
use crate::domain::ParsedCsv;

/// Minimum header width for a usable bank statement
pub const MIN_COLUMNS: usize = 3;

/// Split one line into trimmed, unquoted cells
///
/// Delimiters are single ASCII characters; anything else leaves the line
/// as one cell.
pub fn parse_row(raw: &str, delimiter: char) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let Some(delimiter) = u8::try_from(delimiter).ok().filter(u8::is_ascii) else {
        return vec![clean_cell(raw.trim())];
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(raw.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(clean_cell).collect(),
        _ => Vec::new(),
    }
}

fn clean_cell(cell: &str) -> String {
    let cell = cell.trim();
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        cell[1..cell.len() - 1].to_string()
    } else {
        cell.to_string()
    }
}

/// Split file text into headers and rows
///
/// Rows whose width differs from the header are dropped silently; exports
/// often carry footer or summary lines.
pub fn parse_file(text: &str, delimiter: char) -> Result<ParsedCsv> {
    let lines: Vec<&str> = text.split('\n').filter(|line| !line.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(FormatError::InsufficientRows.into());
    }

    let headers = parse_row(lines[0], delimiter);
    if headers.len() < MIN_COLUMNS {
        return Err(FormatError::TooFewColumns { found: headers.len() }.into());
    }

    let total = lines.len() - 1;
    let rows: Vec<Vec<String>> = lines[1..]
        .iter()
        .map(|line| parse_row(line, delimiter))
        .filter(|row| row.len() == headers.len())
        .collect();

    if rows.is_empty() {
        return Err(FormatError::NoValidRows.into());
    }

    tracing::debug!(
        columns = headers.len(),
        rows = rows.len(),
        discarded = total - rows.len(),
        "parsed csv"
    );

    Ok(ParsedCsv::new(headers, rows))
}
