//! Import command - import transactions from CSV

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Select;

use super::templates::find_template;
use super::{block_on, get_context, parse_delimiter, parse_mappings};
use crate::output;
use tally_core::services::{detect_columns, ImportRequest, ImportResult};
use tally_core::{ColumnMapping, FieldConfig};

/// Number of transactions shown in the preview table
const PREVIEW_ROWS: usize = 10;

pub struct ImportArgs {
    pub file: PathBuf,
    pub template: Option<String>,
    pub mappings: Vec<String>,
    pub delimiter: Option<String>,
    pub interactive: bool,
    pub preview: bool,
    pub json: bool,
}

pub fn run(args: ImportArgs) -> Result<()> {
    let ctx = get_context()?;

    let csv = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let template = match &args.template {
        Some(key) => Some(find_template(&ctx, key)?),
        None => None,
    };
    let delimiter = args.delimiter.as_deref().map(parse_delimiter).transpose()?;
    let mapping = if args.mappings.is_empty() {
        None
    } else {
        Some(parse_mappings(&args.mappings)?)
    };

    let request = if args.interactive {
        // The picked mapping is complete, so the template only contributes defaults
        let delimiter = delimiter
            .or(template.as_ref().map(|t| t.delimiter))
            .unwrap_or(ctx.config.default_delimiter);
        let parsed = ctx.import_service.parse(&csv, delimiter)?;
        let start = mapping
            .or(template.map(|t| t.column_mappings))
            .unwrap_or_else(|| detect_columns(&parsed.headers));
        let fields = ctx.field_registry.list_fields()?;

        ImportRequest {
            csv,
            delimiter: Some(delimiter),
            mapping: Some(pick_columns(&fields, &parsed.headers, &start)?),
            template_id: None,
        }
    } else {
        ImportRequest {
            csv,
            delimiter,
            mapping,
            template_id: template.map(|t| t.id),
        }
    };

    let result = if args.preview {
        ctx.import_service.preview(&request)?
    } else {
        block_on(ctx.import_service.import(&request))??
    };

    if args.json {
        return output::json(&result);
    }

    print_result(&result);
    Ok(())
}

/// Ask for the column of every field, starting from `start`
fn pick_columns(fields: &[FieldConfig], headers: &[String], start: &ColumnMapping) -> Result<ColumnMapping> {
    let mut options = vec!["(not in this file)".to_string()];
    options.extend(headers.iter().cloned());

    let mut picked = ColumnMapping::new();
    for field in fields {
        let preselected = start
            .column_for(&field.id)
            .and_then(|column| headers.iter().position(|h| h == column))
            .map(|index| index + 1)
            .unwrap_or(0);

        let choice = Select::new()
            .with_prompt(format!("Column for {}", field.name))
            .items(&options)
            .default(preselected)
            .interact()?;

        if choice > 0 {
            picked.set(&field.id, &headers[choice - 1]);
        }
    }

    Ok(picked)
}

fn print_result(result: &ImportResult) {
    if result.preview {
        output::warning("PREVIEW MODE - No changes applied");
        println!();
    }

    let mut mapping_table = output::create_table();
    mapping_table.set_header(vec!["Field", "Column"]);
    for (field, column) in result.mapping.iter() {
        mapping_table.add_row(vec![field, column]);
    }
    println!("{}", mapping_table);

    if let Some(transactions) = &result.transactions {
        let mut table = output::create_table();
        table.set_header(vec!["Date", "Description", "From/To", "Amount"]);
        for tx in transactions.iter().take(PREVIEW_ROWS) {
            table.add_row(vec![
                comfy_table::Cell::new(&tx.date),
                comfy_table::Cell::new(&tx.description),
                comfy_table::Cell::new(tx.counterpart().unwrap_or_else(|| "-".to_string())),
                output::amount_cell(tx.amount),
            ]);
        }
        println!("{}", table);
        if transactions.len() > PREVIEW_ROWS {
            println!("  ... and {} more", transactions.len() - PREVIEW_ROWS);
        }
        println!();
    }

    let verb = if result.preview { "Would import" } else { "Imported" };
    println!(
        "{} {} of {} rows ({})",
        verb.green(),
        result.imported.to_string().bold(),
        result.discovered,
        result.batch_id
    );
    if result.skipped > 0 {
        output::warning(&format!("Skipped {} rows without a readable amount", result.skipped));
    }
}
