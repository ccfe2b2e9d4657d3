//! CLI command implementations

pub mod chart;
pub mod config;
pub mod fields;
pub mod import;
pub mod templates;
pub mod transactions;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tally_core::{ColumnMapping, Delimiter, TallyContext};

/// Get the tally directory from environment or default
pub fn get_tally_dir() -> Result<PathBuf> {
    tally_core::config::data_dir().context("Failed to locate tally directory")
}

/// Get or create tally context
pub fn get_context() -> Result<TallyContext> {
    let tally_dir = get_tally_dir()?;

    std::fs::create_dir_all(&tally_dir)
        .with_context(|| format!("Failed to create tally directory: {:?}", tally_dir))?;

    TallyContext::new(&tally_dir).context("Failed to initialize tally context")
}

/// Run an async store operation to completion
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Parse repeated `field=Column` arguments
pub fn parse_mappings(pairs: &[String]) -> Result<ColumnMapping> {
    let mut mapping = ColumnMapping::new();
    for pair in pairs {
        let (field, column) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid mapping '{}', expected field=Column", pair))?;
        mapping.set(field.trim(), column.trim());
    }
    Ok(mapping)
}

pub fn parse_delimiter(raw: &str) -> Result<Delimiter> {
    raw.parse::<Delimiter>().map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mappings() {
        let mapping = parse_mappings(&["amount=Betrag".to_string(), "from/to = Empfänger".to_string()]).unwrap();
        assert_eq!(mapping.column_for("amount"), Some("Betrag"));
        assert_eq!(mapping.column_for("from/to"), Some("Empfänger"));

        assert!(parse_mappings(&["amount".to_string()]).is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), Delimiter::Semicolon);
        assert!(parse_delimiter("x").is_err());
    }
}
