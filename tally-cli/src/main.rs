//! Tally CLI - bank-statement imports in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{chart, config, fields, import, templates, transactions};

/// Tally - import CSV bank statements and look at where the money went
#[derive(Parser)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import transactions from a CSV bank statement
    Import {
        /// Path to CSV file
        file: PathBuf,
        /// Use a saved template (id or name)
        #[arg(long, short)]
        template: Option<String>,
        /// Column mapping as field=Column (repeatable)
        #[arg(long = "map", value_name = "FIELD=COLUMN")]
        mappings: Vec<String>,
        /// Column delimiter: , ; | or tab
        #[arg(long, short)]
        delimiter: Option<String>,
        /// Pick the column for each field interactively
        #[arg(long, short)]
        interactive: bool,
        /// Preview without saving
        #[arg(long)]
        preview: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage importable fields
    Fields {
        #[command(subcommand)]
        command: fields::FieldCommands,
    },

    /// Manage import templates
    Templates {
        #[command(subcommand)]
        command: templates::TemplateCommands,
    },

    /// Browse stored transactions
    Transactions {
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Text to look for in description or counterpart
        #[arg(long, short)]
        search: Option<String>,
        /// Only credit or debit
        #[arg(long = "type")]
        kind: Option<String>,
        /// Smallest absolute amount
        #[arg(long)]
        min: Option<f64>,
        /// Largest absolute amount
        #[arg(long)]
        max: Option<f64>,
        /// Page number (10 per page)
        #[arg(long, short, default_value_t = 1)]
        page: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// Show a chart series
    Chart {
        /// balance, income-expenses, monthly, savings-rate or spending-categories
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tally_core::logging::init("warn");

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { file, template, mappings, delimiter, interactive, preview, json } => {
            import::run(import::ImportArgs { file, template, mappings, delimiter, interactive, preview, json })
        }
        Commands::Fields { command } => fields::run(command),
        Commands::Templates { command } => templates::run(command),
        Commands::Transactions { from, to, search, kind, min, max, page, json } => {
            transactions::run(transactions::BrowseArgs { from, to, search, kind, min, max, page, json })
        }
        Commands::Chart { kind, json } => chart::run(&kind, json),
        Commands::Config { command } => config::run(command),
    }
}
