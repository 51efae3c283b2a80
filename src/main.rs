use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use folder_to_webp::cli::Cli;
use folder_to_webp::compressor::Cwebp;
use folder_to_webp::convert;
use folder_to_webp::provision;
use folder_to_webp::report::Report;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = cli.to_config();
    let compressor = Cwebp;

    provision::ensure(&compressor).context("Failed to provision cwebp")?;

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock());
    convert::run(&config, &compressor, &mut report).context("Conversion run failed")?;

    Ok(())
}
