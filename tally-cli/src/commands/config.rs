//! Config command - show and change settings.json

use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{get_tally_dir, parse_delimiter};
use crate::output;
use tally_core::config::{Config, StorageKind};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective settings (environment overrides applied)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one setting: storage, host, port or delimiter
    Set {
        key: String,
        value: String,
    },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let tally_dir = get_tally_dir()?;

    match command {
        Some(ConfigCommands::Set { key, value }) => {
            let mut config = Config::load_file(&tally_dir)?;
            match key.as_str() {
                "storage" => config.storage = value.parse::<StorageKind>()?,
                "host" => config.server.host = value.clone(),
                "port" => config.server.port = value.parse().map_err(|_| anyhow!("Invalid port: {}", value))?,
                "delimiter" => config.default_delimiter = parse_delimiter(&value)?,
                other => bail!("Unknown setting '{}' (expected storage, host, port or delimiter)", other),
            }
            config.save(&tally_dir)?;
            output::success(&format!("{} set to {}", key, value));
        }
        Some(ConfigCommands::Show { json }) => show(&tally_dir, json)?,
        None => show(&tally_dir, false)?,
    }

    Ok(())
}

fn show(tally_dir: &std::path::Path, json: bool) -> Result<()> {
    let config = Config::load(tally_dir)?;
    if json {
        return output::json(&serde_json::json!({
            "dataDir": tally_dir,
            "storage": config.storage,
            "server": config.server,
            "defaultDelimiter": config.default_delimiter,
        }));
    }

    println!("{}", "Settings".bold());
    println!("  Data dir:  {}", tally_dir.display());
    println!("  Storage:   {:?}", config.storage);
    println!("  Server:    {}", config.bind_address());
    println!("  Delimiter: {}", config.default_delimiter);
    Ok(())
}
