use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "propfill",
    about = "Fill in missing values in properties files; secrets stay obfuscated on disk.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a properties file and prompt in the terminal for missing values.
    Fill {
        /// TOML manifest declaring the expected properties.
        #[arg(long)]
        manifest: PathBuf,

        /// The properties file to load (created if absent).
        file: PathBuf,

        /// Report missing values without prompting for them.
        #[arg(long)]
        non_interactive: bool,

        /// Upper bound on the prompt wait, in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Print current values, masking secrets.
    Show {
        /// TOML manifest declaring the expected properties.
        #[arg(long)]
        manifest: PathBuf,

        /// The properties file to read.
        file: PathBuf,
    },

    /// Set a single property (value is prompted, without echo if secret).
    Set {
        /// TOML manifest declaring the expected properties.
        #[arg(long)]
        manifest: PathBuf,

        /// The properties file to update.
        file: PathBuf,

        /// The property name to set.
        key: String,
    },
}
