use std::path::Path;

use anyhow::{Context, Result};

use propfill::PropertyStore;

use crate::manifest;

pub fn run(manifest_path: &Path, file: &Path) -> Result<()> {
    let defs = manifest::read(manifest_path)?;

    let mut builder = PropertyStore::builder().interactive(false);
    for def in defs {
        builder = builder.definition(def);
    }
    let store = builder.build()?;
    store
        .load(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    for key in store.keys() {
        let secret = store
            .definitions()
            .iter()
            .any(|d| d.secret && d.name == key);
        let shown = if secret {
            "********".to_string()
        } else {
            store.get(&key).unwrap_or_default()
        };
        println!("{}={}", key, shown);
    }

    for def in store.definitions() {
        if store.get(&def.name).is_none() {
            println!("{}=<unset>", def.name);
        }
    }

    Ok(())
}
