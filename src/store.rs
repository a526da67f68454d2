//! The property store: a plain name→value mapping with declared definitions,
//! optional parent fallback, optional file backing, and the secrecy transform
//! applied on the way in and out of durable storage.
//!
//! The store wraps its mapping rather than exposing generic map mutators, so
//! every mutation goes through the secrecy and fill-in hooks.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::info;

use crate::builder::StoreBuilder;
use crate::codec;
use crate::def::PropertyDef;
use crate::error::{PropfillError, Result};
use crate::format;
use crate::prompt::Prompter;
use crate::resolver::{self, FillOutcome};

/// Comment header written when the store persists itself after a fill.
pub const DEFAULT_COMMENTS: &str = "Generated with propfill. Delete or edit this file to reset.";

pub struct PropertyStore {
    values: RwLock<HashMap<String, String>>,
    defs: Vec<PropertyDef>,
    parent: Option<Arc<PropertyStore>>,
    backing: Mutex<Option<PathBuf>>,
    interactive: bool,
    timeout: Duration,
    display_banner: bool,
    prompter: Arc<dyn Prompter>,
    /// Single-writer discipline: load, store and fill serialize through this.
    op: Mutex<()>,
}

impl PropertyStore {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn new(
        defs: Vec<PropertyDef>,
        parent: Option<Arc<PropertyStore>>,
        interactive: bool,
        timeout: Duration,
        display_banner: bool,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            defs,
            parent,
            backing: Mutex::new(None),
            interactive,
            timeout,
            display_banner,
            prompter,
            op: Mutex::new(()),
        }
    }

    /// Load the mapping from a properties file, decode secret values in
    /// place, then run the missing-value workflow.
    ///
    /// If the path does not exist, an empty file is created there (parent
    /// directories included) and the workflow still runs against the empty
    /// mapping. On any failure the previously loaded state is left intact.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<FillOutcome> {
        let _op = lock(&self.op);
        let path = path.as_ref();

        if path.exists() {
            info!(path = %path.display(), "loading properties");
            let raw = fs::read_to_string(path)?;
            let decoded = self.parse_and_decode(&raw)?;
            *write(&self.values) = decoded;
        } else {
            info!(path = %path.display(), "properties file does not exist, creating it");
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }
            fs::write(path, "")?;
            *write(&self.values) = HashMap::new();
        }

        *lock(&self.backing) = Some(path.to_path_buf());
        resolver::run(self)
    }

    /// Load the mapping from in-memory properties text. The backing path, if
    /// any, is left as it was.
    pub fn load_str(&self, text: &str) -> Result<FillOutcome> {
        let _op = lock(&self.op);
        let decoded = self.parse_and_decode(text)?;
        *write(&self.values) = decoded;
        resolver::run(self)
    }

    /// Serialize the current mapping to `path` with the given comment header,
    /// secret values encoded. Written atomically: temp file, fsync, rename.
    pub fn store(&self, path: impl AsRef<Path>, comments: &str) -> Result<()> {
        let _op = lock(&self.op);
        self.store_path_unlocked(path.as_ref(), comments)
    }

    /// Serialize the current mapping to an arbitrary writer.
    pub fn store_writer<W: Write>(&self, mut w: W, comments: &str) -> Result<()> {
        let _op = lock(&self.op);
        format::write(&mut w, &self.encoded_snapshot(), comments)?;
        Ok(())
    }

    /// Run the missing-value workflow against the current mapping.
    /// Called automatically at the end of every load.
    pub fn fill_missing(&self) -> Result<FillOutcome> {
        let _op = lock(&self.op);
        resolver::run(self)
    }

    /// Look up a value, falling through to the parent store on a local miss.
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = read(&self.values).get(name).cloned() {
            return Some(value);
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Set a value locally. Never writes through to the parent.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        write(&self.values).insert(name.into(), value.into());
    }

    /// Locally present keys, sorted. Parent keys are not included.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = read(&self.values).keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The registered definitions, in presentation order.
    pub fn definitions(&self) -> &[PropertyDef] {
        &self.defs
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn display_banner(&self) -> bool {
        self.display_banner
    }

    pub fn backing_path(&self) -> Option<PathBuf> {
        lock(&self.backing).clone()
    }

    pub(crate) fn prompter(&self) -> Arc<dyn Prompter> {
        Arc::clone(&self.prompter)
    }

    /// Persist to the backing path, if there is one. Caller holds the op lock.
    pub(crate) fn persist_unlocked(&self) -> Result<()> {
        if let Some(path) = lock(&self.backing).clone() {
            self.store_path_unlocked(&path, DEFAULT_COMMENTS)?;
        }
        Ok(())
    }

    /// Parse properties text into a fresh mapping (duplicate keys last-wins)
    /// and decode every defined secret value. The store's own mapping is not
    /// touched until this succeeds, so a bad file cannot corrupt loaded state.
    fn parse_and_decode(&self, raw: &str) -> Result<HashMap<String, String>> {
        let mut map = HashMap::new();
        for (key, value) in format::parse(raw)? {
            map.insert(key, value);
        }

        for def in &self.defs {
            if !def.secret {
                continue;
            }
            if let Some(encoded) = map.get(&def.name) {
                let plain = codec::decode(encoded).map_err(|e| match e {
                    PropfillError::Decode(msg) => {
                        PropfillError::Decode(format!("secret property '{}': {}", def.name, msg))
                    }
                    other => other,
                })?;
                map.insert(def.name.clone(), plain);
            }
        }

        Ok(map)
    }

    fn store_path_unlocked(&self, path: &Path, comments: &str) -> Result<()> {
        info!(path = %path.display(), "storing properties");
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir)?;
                dir
            }
            _ => Path::new("."),
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "properties".into());
        let tmp = parent.join(format!(".{}.tmp.{}", file_name, rand::random::<u64>()));

        {
            let mut file = fs::File::create(&tmp)?;
            format::write(&mut file, &self.encoded_snapshot(), comments)?;
            file.sync_all()?;
        }

        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// A private copy of the mapping with secret values encoded. Serialization
    /// works from this copy, so the in-memory values stay plaintext and `get`
    /// can never observe a transiently encoded secret, write failure or not.
    fn encoded_snapshot(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> =
            read(&self.values).clone().into_iter().collect();
        for (name, value) in pairs.iter_mut() {
            if self.is_secret(name) {
                *value = codec::encode(value);
            }
        }
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }

    fn is_secret(&self, name: &str) -> bool {
        self.defs.iter().any(|d| d.secret && d.name == name)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(rwlock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    rwlock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(rwlock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    rwlock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FillOutcome;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn basic_store() -> PropertyStore {
        PropertyStore::builder()
            .property("user", "Login user")
            .secret("password", "Login password")
            .interactive(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_load_str_plain_values() {
        let store = basic_store();
        store.load_str("user=alice\n").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("alice"));
    }

    #[test]
    fn test_load_str_decodes_secret() {
        let store = basic_store();
        let text = format!("user=alice\npassword={}\n", crate::codec::encode("s3cr3t"));
        store.load_str(&text).unwrap();
        assert_eq!(store.get("password").as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_missing_property_stays_absent() {
        let store = basic_store();
        let outcome = store.load_str("user=alice\n").unwrap();
        assert_eq!(outcome, FillOutcome::Skipped);
        assert_eq!(store.get("password"), None);
    }

    #[test]
    fn test_undefined_keys_pass_through_untouched() {
        let store = basic_store();
        store.load_str("user=alice\nextra=raw-value\n").unwrap();
        assert_eq!(store.get("extra").as_deref(), Some("raw-value"));
    }

    #[test]
    fn test_invalid_secret_encoding_fails_whole_load() {
        let store = basic_store();
        store.load_str("user=old\n").unwrap();

        let result = store.load_str("user=alice\npassword=***not-base64***\n");
        assert!(matches!(result, Err(PropfillError::Decode(_))));
        // The failed load must not publish a partial mapping.
        assert_eq!(store.get("user").as_deref(), Some("old"));
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.properties");

        let store = basic_store();
        store.set("user", "alice");
        store.set("password", "s3cr3t");
        store.store(&path, "test header").unwrap();

        let reloaded = basic_store();
        reloaded.load(&path).unwrap();
        assert_eq!(reloaded.get("user").as_deref(), Some("alice"));
        assert_eq!(reloaded.get("password").as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_stored_file_holds_encoded_secret_and_plain_user() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.properties");

        let store = basic_store();
        store.set("user", "alice");
        store.set("password", "s3cr3t");
        store.store(&path, "").unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("user=alice"));
        assert!(on_disk.contains(&format!("password={}", crate::codec::encode("s3cr3t"))));
        assert!(!on_disk.contains("password=s3cr3t"));
    }

    #[test]
    fn test_get_stays_plaintext_after_store() {
        let dir = TempDir::new().unwrap();
        let store = basic_store();
        store.set("password", "s3cr3t");
        store.store(dir.path().join("p.properties"), "").unwrap();
        assert_eq!(store.get("password").as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_repeated_store_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.properties");
        let store = basic_store();
        store.set("password", "s3cr3t");

        store.store(&path, "").unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        store.store(&path, "").unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        // Encode/decode symmetry: no double-encoding across repeated stores.
        assert_eq!(first, second);
    }

    #[test]
    fn test_store_writer_output() {
        let store = basic_store();
        store.set("user", "alice");
        let mut buf = Vec::new();
        store.store_writer(&mut buf, "header").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# header\n"));
        assert!(text.contains("user=alice\n"));
    }

    #[test]
    fn test_load_creates_missing_file_and_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("app.properties");

        let store = basic_store();
        store.load(&path).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert_eq!(store.backing_path(), Some(path));
    }

    #[test]
    fn test_unreadable_path_returns_io_error() {
        let dir = TempDir::new().unwrap();
        // A directory exists at the path, so reading it as a file fails.
        let path = dir.path().join("actually-a-dir");
        std::fs::create_dir(&path).unwrap();

        let store = basic_store();
        let result = store.load(&path);
        assert!(matches!(result, Err(PropfillError::Io(_))));
    }

    #[test]
    fn test_parent_fallback() {
        let parent = Arc::new(
            PropertyStore::builder()
                .property("region", "Deployment region")
                .interactive(false)
                .build()
                .unwrap(),
        );
        parent.set("region", "eu-west-1");

        let child = PropertyStore::builder()
            .property("region", "Deployment region")
            .defaults(Arc::clone(&parent))
            .interactive(false)
            .build()
            .unwrap();

        assert_eq!(child.get("region").as_deref(), Some("eu-west-1"));

        // Local values shadow the parent, and setting never writes through.
        child.set("region", "us-east-1");
        assert_eq!(child.get("region").as_deref(), Some("us-east-1"));
        assert_eq!(parent.get("region").as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_duplicate_keys_in_file_last_wins() {
        let store = basic_store();
        store.load_str("user=first\nuser=second\n").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("second"));
    }

    #[test]
    fn test_concurrent_store_and_get_never_observe_encoded_secret() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.properties");
        let store = Arc::new(basic_store());
        store.set("password", "s3cr3t");

        let writer = {
            let store = Arc::clone(&store);
            let path = path.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    store.store(&path, "").unwrap();
                }
            })
        };

        for _ in 0..500 {
            assert_eq!(store.get("password").as_deref(), Some("s3cr3t"));
        }
        writer.join().unwrap();
    }
}
