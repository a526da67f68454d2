//! The prompter seam: how the store asks an external collaborator for values.
//!
//! The core depends only on the [`Prompter`] trait. Anything that can show a
//! row of `{name, description, secret, current}` entries and hand back values
//! can fill a store: a terminal session, a form, a scripted test double.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{PropfillError, Result};

/// One row of the snapshot handed to a prompter: a defined property and its
/// current value (empty string when absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    pub name: String,
    pub description: String,
    pub secret: bool,
    pub current: String,
}

/// What the prompter came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The operator accepted: `(name, value)` pairs to commit to the store.
    Accepted(Vec<(String, String)>),
    /// The operator dismissed the interaction; the store is left untouched.
    Declined,
}

/// Cooperative cancellation signal. The core raises it when the prompt
/// deadline elapses; prompters should check it at convenient points and
/// bail out with [`PromptOutcome::Declined`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An external collaborator that can collect property values.
///
/// `present` runs on its own thread; the core waits at most the configured
/// timeout and discards any result that arrives after `cancel` is raised.
pub trait Prompter: Send + Sync {
    fn present(&self, entries: &[PromptEntry], cancel: &CancelFlag) -> Result<PromptOutcome>;
}

/// The headless prompter: always declines, leaving missing values absent.
/// This is the default, so an unconfigured store never blocks on a human.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPrompter;

impl Prompter for NoopPrompter {
    fn present(&self, _entries: &[PromptEntry], _cancel: &CancelFlag) -> Result<PromptOutcome> {
        Ok(PromptOutcome::Declined)
    }
}

/// Line-oriented terminal prompter. Secret values are read without echo via
/// `rpassword`; plain values via stdin. Pressing Enter keeps the current
/// value; end-of-input (Ctrl-D) declines the whole interaction.
///
/// Blank answers for properties that had no value are omitted from the
/// accepted set, so untouched missing properties stay absent rather than
/// becoming empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn present(&self, entries: &[PromptEntry], cancel: &CancelFlag) -> Result<PromptOutcome> {
        let mut accepted = Vec::with_capacity(entries.len());
        println!("Some properties are missing. Enter a value, or press Enter to keep the current one.");

        for entry in entries {
            // stdin reads are not interruptible; honor cancellation between rows.
            if cancel.is_cancelled() {
                return Ok(PromptOutcome::Declined);
            }

            if !entry.description.is_empty() {
                println!("  {}: {}", entry.name, entry.description);
            }

            let answer = if entry.secret {
                let state = if entry.current.is_empty() { "unset" } else { "set" };
                rpassword::prompt_password(format!("{} [{}]: ", entry.name, state))
                    .map_err(|e| PropfillError::Prompt(e.to_string()))?
            } else {
                print!("{} [{}]: ", entry.name, entry.current);
                std::io::stdout()
                    .flush()
                    .map_err(|e| PropfillError::Prompt(e.to_string()))?;
                let mut line = String::new();
                let read = std::io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|e| PropfillError::Prompt(e.to_string()))?;
                if read == 0 {
                    return Ok(PromptOutcome::Declined);
                }
                line.trim_end_matches(['\r', '\n']).to_string()
            };

            let value = if answer.is_empty() {
                entry.current.clone()
            } else {
                answer
            };
            if value.is_empty() {
                continue;
            }
            accepted.push((entry.name.clone(), value));
        }

        Ok(PromptOutcome::Accepted(accepted))
    }
}
