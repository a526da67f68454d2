mod cli;
mod commands;
mod manifest;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Fill {
            manifest,
            file,
            non_interactive,
            timeout_ms,
        } => commands::fill::run(&manifest, &file, non_interactive, timeout_ms)?,
        Command::Show { manifest, file } => commands::show::run(&manifest, &file)?,
        Command::Set {
            manifest,
            file,
            key,
        } => commands::set::run(&manifest, &file, &key)?,
    }

    Ok(())
}
