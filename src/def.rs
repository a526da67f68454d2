/// A declared property: its name, a human description shown when prompting,
/// and whether its value is kept obfuscated on disk.
///
/// Identity is `name`. Definitions are treated as immutable once registered
/// with a [`StoreBuilder`](crate::StoreBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: String,
    pub description: String,
    pub secret: bool,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>, secret: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            secret,
        }
    }

    /// A plain (non-secret) property.
    pub fn plain(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, false)
    }

    /// A secret property: encoded on disk, plaintext in memory.
    pub fn secret(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, true)
    }
}
