//! propfill: a property store over flat `key=value` files, with declared
//! property metadata, reversible on-disk obfuscation of secret values, and a
//! bounded, cancellable fill-in workflow for missing values.
//!
//! ```no_run
//! use propfill::PropertyStore;
//!
//! let store = PropertyStore::builder()
//!     .property("user", "Who to connect as")
//!     .secret("password", "Credentials for the connection")
//!     .interactive(false)
//!     .from_path("app.properties")?;
//!
//! let user = store.get("user"); // None means "not configured"
//! # Ok::<(), propfill::PropfillError>(())
//! ```
//!
//! Secret values are stored base64-encoded on disk and plaintext in memory;
//! the transform is obfuscation against casual viewing, not encryption.

pub mod builder;
pub mod codec;
mod deadline;
pub mod def;
pub mod error;
pub mod format;
pub mod prompt;
pub mod resolver;
pub mod store;

pub use builder::StoreBuilder;
pub use def::PropertyDef;
pub use error::{PropfillError, Result};
pub use prompt::{CancelFlag, NoopPrompter, PromptEntry, PromptOutcome, Prompter, TerminalPrompter};
pub use resolver::FillOutcome;
pub use store::PropertyStore;
