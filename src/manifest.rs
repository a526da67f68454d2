//! The CLI's property manifest: a TOML file declaring which properties a
//! properties file is expected to hold.
//!
//! ```toml
//! [[property]]
//! name = "user"
//! description = "Who to connect as"
//!
//! [[property]]
//! name = "password"
//! description = "Credentials for the connection"
//! secret = true
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use propfill::PropertyDef;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "property")]
    properties: Vec<ManifestProperty>,
}

#[derive(Debug, Deserialize)]
struct ManifestProperty {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    secret: bool,
}

/// Read and parse a manifest into property definitions, in file order.
pub fn read(path: &Path) -> Result<Vec<PropertyDef>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest: Manifest = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

    if manifest.properties.is_empty() {
        bail!("Manifest {} declares no properties.", path.display());
    }

    Ok(manifest
        .properties
        .into_iter()
        .map(|p| PropertyDef::new(p.name, p.description, p.secret))
        .collect())
}
