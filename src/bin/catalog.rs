//! Catalog CLI Binary
//!
//! Command-line interface for catalog administration.

use anyhow::Context;
use catalog_admin::logging::init_logging;
use catalog_admin::tooling::cli::{command_name, Cli, CliContext};
use clap::Parser;
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = CliContext::load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    let logging = config.logging.clone().with_overrides(
        cli.log_level.as_deref(),
        cli.log_format.as_deref(),
        cli.log_output.as_deref(),
        cli.log_file.clone(),
    );
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let context = CliContext::from_config(config, cli.data_dir.clone())
        .context("Failed to open catalog")?
        .with_language(cli.lang);

    let output = context.execute(&cli.command)?;
    tracing::debug!(command = command_name(&cli.command), "command finished");
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
