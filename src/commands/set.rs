use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use propfill::{store::DEFAULT_COMMENTS, PropertyStore};

use crate::manifest;

pub fn run(manifest_path: &Path, file: &Path, key: &str) -> Result<()> {
    let defs = manifest::read(manifest_path)?;
    let secret = match defs.iter().find(|d| d.name == key) {
        Some(def) => def.secret,
        None => bail!(
            "'{}' is not declared in {}. Add it to the manifest first.",
            key,
            manifest_path.display()
        ),
    };

    let mut builder = PropertyStore::builder().interactive(false);
    for def in defs {
        builder = builder.definition(def);
    }
    let store = builder.build()?;
    store
        .load(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let value = if secret {
        rpassword::prompt_password(format!("Value for '{}': ", key))
            .context("Failed to read secret value")?
    } else {
        print!("Value for '{}': ", key);
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };
    if value.is_empty() {
        bail!("Value must not be empty.");
    }

    store.set(key, value);
    store
        .store(file, DEFAULT_COMMENTS)
        .with_context(|| format!("Failed to write {}", file.display()))?;

    println!("Property '{}' saved.", key);
    Ok(())
}
