//! Builder for [`PropertyStore`]: definitions, defaults, workflow knobs.
//!
//! Process-wide overrides (the `PROPFILL_*` environment variables) are read
//! exactly once, in `build()`, and baked into the store. They are never
//! consulted again mid-operation.

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::def::PropertyDef;
use crate::error::{PropfillError, Result};
use crate::prompt::{NoopPrompter, Prompter};
use crate::store::PropertyStore;

/// Overrides the interactive flag (`true`/`false`).
pub const ENV_PROMPT: &str = "PROPFILL_PROMPT";
/// Overrides the prompt timeout in milliseconds. Must not be negative.
pub const ENV_TIMEOUT_MS: &str = "PROPFILL_TIMEOUT_MS";
/// Overrides the startup banner flag. Cosmetic only.
pub const ENV_BANNER: &str = "PROPFILL_BANNER";

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);

pub struct StoreBuilder {
    defs: Vec<PropertyDef>,
    parent: Option<Arc<PropertyStore>>,
    interactive: bool,
    timeout: Duration,
    display_banner: bool,
    prompter: Arc<dyn Prompter>,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            parent: None,
            interactive: true,
            timeout: DEFAULT_TIMEOUT,
            display_banner: true,
            prompter: Arc::new(NoopPrompter),
        }
    }

    /// Register a plain property.
    pub fn property(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.definition(PropertyDef::plain(name, description))
    }

    /// Register a secret property: encoded on disk, plaintext in memory.
    pub fn secret(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.definition(PropertyDef::secret(name, description))
    }

    /// Register a definition. Insertion order is the presentation order shown
    /// to the prompter. Registering a name twice keeps the earlier position
    /// but the later definition wins.
    pub fn definition(mut self, def: PropertyDef) -> Self {
        if let Some(existing) = self.defs.iter_mut().find(|d| d.name == def.name) {
            *existing = def;
        } else {
            self.defs.push(def);
        }
        self
    }

    /// A parent store consulted when a lookup misses locally.
    /// The parent is never mutated through the child.
    pub fn defaults(mut self, parent: Arc<PropertyStore>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Whether missing values trigger the prompter after a load. Default true.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Upper bound on the prompter wait. Default 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    /// Whether hosts should show the startup banner. Cosmetic only.
    pub fn display_banner(mut self, display: bool) -> Self {
        self.display_banner = display;
        self
    }

    /// The collaborator asked to fill missing values.
    /// Defaults to [`NoopPrompter`], which always declines.
    pub fn prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Resolve environment overrides and construct the store, not yet loaded.
    /// Fails with `InvalidConfig` before any I/O if an override is malformed.
    pub fn build(mut self) -> Result<PropertyStore> {
        self.apply_env_overrides()?;
        Ok(PropertyStore::new(
            self.defs,
            self.parent,
            self.interactive,
            self.timeout,
            self.display_banner,
            self.prompter,
        ))
    }

    /// Build and load from a file: equivalent to `build()` followed by
    /// `load(path)`.
    pub fn from_path(self, path: impl AsRef<Path>) -> Result<PropertyStore> {
        let store = self.build()?;
        store.load(path)?;
        Ok(store)
    }

    /// Build and load from in-memory properties text.
    pub fn from_text(self, text: &str) -> Result<PropertyStore> {
        let store = self.build()?;
        store.load_str(text)?;
        Ok(store)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| env::var(name).ok().filter(|v| !v.is_empty()))
    }

    fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get(ENV_PROMPT) {
            self.interactive = parse_bool(ENV_PROMPT, &v)?;
        }
        if let Some(v) = get(ENV_BANNER) {
            self.display_banner = parse_bool(ENV_BANNER, &v)?;
        }
        if let Some(v) = get(ENV_TIMEOUT_MS) {
            let ms: i64 = v.trim().parse().map_err(|_| {
                PropfillError::InvalidConfig(format!(
                    "{} must be an integer, got {:?}",
                    ENV_TIMEOUT_MS, v
                ))
            })?;
            if ms < 0 {
                return Err(PropfillError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    ENV_TIMEOUT_MS, ms
                )));
            }
            self.timeout = Duration::from_millis(ms as u64);
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(PropfillError::InvalidConfig(format!(
            "{} must be a boolean, got {:?}",
            name, value
        ))),
    }
}
