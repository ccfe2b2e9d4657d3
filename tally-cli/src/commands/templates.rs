//! Templates command - manage saved import configurations

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, parse_delimiter, parse_mappings};
use crate::output;
use tally_core::{CsvTemplate, TallyContext, TemplateFormData};

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List saved templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one template
    Show {
        /// Template id or name
        template: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a template
    Create {
        /// Template name
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Column delimiter: , ; | or tab
        #[arg(long, default_value = ";")]
        delimiter: String,
        /// Date format shown to users, e.g. DD.MM.YYYY
        #[arg(long, default_value = "YYYY-MM-DD")]
        date_format: String,
        /// Column mapping as field=Column (repeatable)
        #[arg(long = "map", value_name = "FIELD=COLUMN")]
        mappings: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a template; omitted options keep their value
    Update {
        /// Template id or name
        template: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        delimiter: Option<String>,
        #[arg(long)]
        date_format: Option<String>,
        /// Column mapping as field=Column (repeatable, merged into the existing one)
        #[arg(long = "map", value_name = "FIELD=COLUMN")]
        mappings: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a template
    Delete {
        /// Template id or name
        template: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Look up a template by id, falling back to a case-insensitive name match
pub fn find_template(ctx: &TallyContext, key: &str) -> Result<CsvTemplate> {
    if let Some(template) = ctx.template_store.get(key)? {
        return Ok(template);
    }
    ctx.template_store
        .list()?
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| anyhow!("Template not found: {}", key))
}

pub fn run(command: TemplateCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        TemplateCommands::List { json } => {
            let templates = ctx.template_store.list()?;
            if json {
                return output::json(&templates);
            }
            if templates.is_empty() {
                println!("No saved templates.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Delimiter", "Date format", "Mapped fields", "Updated"]);
            for t in &templates {
                table.add_row(vec![
                    t.id.clone(),
                    t.name.clone(),
                    t.delimiter.label().to_string(),
                    t.date_format.clone(),
                    t.column_mappings.iter().count().to_string(),
                    t.updated_at.clone(),
                ]);
            }
            println!("{}", table);
        }
        TemplateCommands::Show { template, json } => {
            let template = find_template(&ctx, &template)?;
            if json {
                return output::json(&template);
            }
            print_template(&template);
        }
        TemplateCommands::Create { name, description, delimiter, date_format, mappings, json } => {
            let form = TemplateFormData {
                name,
                description,
                delimiter: parse_delimiter(&delimiter)?,
                date_format,
                column_mappings: parse_mappings(&mappings)?,
            };
            let template = ctx.template_store.create(form)?;
            if json {
                return output::json(&template);
            }
            output::success(&format!("Template '{}' created", template.name));
            println!("  ID: {}", template.id);
        }
        TemplateCommands::Update { template, name, description, delimiter, date_format, mappings, json } => {
            let existing = find_template(&ctx, &template)?;
            let mut form = existing.form_data();
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(delimiter) = delimiter {
                form.delimiter = parse_delimiter(&delimiter)?;
            }
            if let Some(date_format) = date_format {
                form.date_format = date_format;
            }
            for (field, column) in parse_mappings(&mappings)?.iter() {
                form.column_mappings.set(field, column);
            }

            let updated = ctx.template_store.update(&existing.id, form)?;
            if json {
                return output::json(&updated);
            }
            output::success(&format!("Template '{}' updated", updated.name));
        }
        TemplateCommands::Delete { template, force, json } => {
            let existing = find_template(&ctx, &template)?;

            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete template '{}'?", existing.name))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            if !ctx.template_store.delete(&existing.id)? {
                bail!("Template not found: {}", existing.id);
            }
            if json {
                return output::json(&serde_json::json!({ "deleted": existing.id }));
            }
            output::success(&format!("Template '{}' deleted", existing.name));
        }
    }

    Ok(())
}

fn print_template(template: &CsvTemplate) {
    println!("{}", template.name.green().bold());
    if !template.description.is_empty() {
        println!("  {}", template.description);
    }
    println!("  ID:          {}", template.id);
    println!("  Delimiter:   {}", template.delimiter);
    println!("  Date format: {}", template.date_format);
    println!("  Created:     {}", template.created_at);
    println!("  Updated:     {}", template.updated_at);

    if template.column_mappings.is_empty() {
        output::info("  No columns mapped");
        return;
    }
    let mut table = output::create_table();
    table.set_header(vec!["Field", "Column"]);
    for (field, column) in template.column_mappings.iter() {
        table.add_row(vec![field, column]);
    }
    println!("{}", table);
}
