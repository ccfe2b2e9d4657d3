//! Fields command - manage importable fields

use anyhow::{anyhow, Result};
use clap::Subcommand;
use dialoguer::Confirm;

use super::get_context;
use crate::output;
use tally_core::{FieldType, NewField};

#[derive(Subcommand)]
pub enum FieldCommands {
    /// List built-in and custom fields
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a custom field
    Add {
        /// Display name
        name: String,
        /// string, number or date
        #[arg(long = "type", default_value = "string")]
        field_type: String,
        #[arg(long)]
        required: bool,
        #[arg(long, default_value = "")]
        description: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a custom field
    Remove {
        /// Field id
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: FieldCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        FieldCommands::List { json } => {
            let fields = ctx.field_registry.list_fields()?;
            if json {
                return output::json(&fields);
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Type", "Required", "Built-in", "Description"]);
            for f in &fields {
                table.add_row(vec![
                    f.id.clone(),
                    f.name.clone(),
                    f.field_type.as_str().to_string(),
                    if f.required { "yes" } else { "" }.to_string(),
                    if tally_core::domain::is_builtin(&f.id) { "yes" } else { "" }.to_string(),
                    f.description.clone(),
                ]);
            }
            println!("{}", table);
        }
        FieldCommands::Add { name, field_type, required, description, json } => {
            let field_type: FieldType = field_type.parse().map_err(|e: String| anyhow!(e))?;
            let field = ctx.field_registry.add_field(NewField { name, field_type, required, description })?;
            if json {
                return output::json(&field);
            }
            output::success(&format!("Field '{}' added", field.name));
            println!("  ID: {}", field.id);
        }
        FieldCommands::Remove { id, force, json } => {
            let Some(field) = ctx.field_registry.get(&id)? else {
                if json {
                    return output::json(&serde_json::json!({ "removed": false }));
                }
                output::warning(&format!("No field with id '{}'", id));
                return Ok(());
            };

            if !force && !json && !tally_core::domain::is_builtin(&id) {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove field '{}'? Templates mapping it keep the stale entry.", field.name))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = ctx.field_registry.remove_field(&id)?;
            if json {
                return output::json(&serde_json::json!({ "removed": removed }));
            }
            output::success(&format!("Field '{}' removed", field.name));
        }
    }

    Ok(())
}
