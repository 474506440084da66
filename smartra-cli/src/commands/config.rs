//! Inspect configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartra_core::SmartraConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective config (file + environment) as TOML
    Show,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", SmartraConfig::config_path().display());
        }
        ConfigCommands::Show => {
            let config = SmartraConfig::load().context("Failed to load config")?;
            print!("{}", config.to_toml().context("Failed to render config")?);
        }
    }
    Ok(())
}
