//! Hovertip - rich hover tooltips for static documentation sites.

mod cli;
mod config;
mod embed;
mod external;
mod html;
mod logger;
mod page;
mod site;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => {
            // Invalid configuration is fatal before any page is read
            let settings = config.validate()?;
            cli::build::build_site(&config, &settings)
        }
        Commands::Clean { .. } => cli::clean::clean_output(&config),
    }
}
