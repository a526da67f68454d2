use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use propfill::{FillOutcome, PropertyStore, TerminalPrompter};

use crate::manifest;

const BANNER: &str = "\
  .:. propfill .:.
  fill in the blanks, keep the secrets
";

pub fn run(
    manifest_path: &Path,
    file: &Path,
    non_interactive: bool,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let defs = manifest::read(manifest_path)?;

    let mut builder = PropertyStore::builder()
        .prompter(Arc::new(TerminalPrompter))
        .interactive(!non_interactive);
    for def in defs {
        builder = builder.definition(def);
    }
    if let Some(ms) = timeout_ms {
        builder = builder.timeout_ms(ms);
    }

    let store = builder.build().context("Invalid configuration")?;

    if store.display_banner() {
        print!("{}", BANNER);
    }

    let outcome = store
        .load(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    match outcome {
        FillOutcome::Complete => println!("All properties present in {}.", file.display()),
        FillOutcome::Applied => println!("Updated {}.", file.display()),
        FillOutcome::Skipped => {
            let missing: Vec<&str> = store
                .definitions()
                .iter()
                .filter(|d| store.get(&d.name).is_none())
                .map(|d| d.name.as_str())
                .collect();
            println!("Missing (not prompted): {}", missing.join(", "));
        }
        FillOutcome::Declined => println!("Prompt dismissed; missing values left unset."),
        FillOutcome::TimedOut => println!("Prompt timed out; missing values left unset."),
        FillOutcome::Failed => println!("Prompt failed; missing values left unset."),
    }

    Ok(())
}
