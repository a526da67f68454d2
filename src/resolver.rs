//! The missing-value workflow: find defined properties without values, hand a
//! snapshot to the prompter under a deadline, commit what comes back.
//!
//! Prompt failures and timeouts never abort a load; the store stays usable,
//! just possibly incomplete. Only persisting accepted values can fail hard.

use tracing::{debug, warn};

use crate::deadline::{self, DeadlineResult};
use crate::error::{PropfillError, Result};
use crate::prompt::{CancelFlag, PromptEntry, PromptOutcome};
use crate::store::PropertyStore;

/// How a fill pass ended. Anything other than `Applied` leaves the store
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Every defined property already had a value; no interaction happened.
    Complete,
    /// Values are missing but interactive prompting is disabled.
    Skipped,
    /// The prompter supplied values; they were committed and persisted.
    Applied,
    /// The operator dismissed the prompt.
    Declined,
    /// The prompter did not answer within the timeout.
    TimedOut,
    /// The prompter failed outright.
    Failed,
}

/// Caller holds the store's op lock (or is the load that took it).
pub(crate) fn run(store: &PropertyStore) -> Result<FillOutcome> {
    let defs = store.definitions();
    if defs.iter().all(|def| store.get(&def.name).is_some()) {
        return Ok(FillOutcome::Complete);
    }

    if !store.interactive() {
        debug!("properties are missing, but interactive prompting is disabled");
        return Ok(FillOutcome::Skipped);
    }

    // Snapshot every defined property, not just the missing ones, so the
    // operator can revise already-present values in the same interaction.
    let entries: Vec<PromptEntry> = defs
        .iter()
        .map(|def| PromptEntry {
            name: def.name.clone(),
            description: def.description.clone(),
            secret: def.secret,
            current: store.get(&def.name).unwrap_or_default(),
        })
        .collect();

    let timeout = store.timeout();
    let prompter = store.prompter();
    let cancel = CancelFlag::new();
    debug!(properties = entries.len(), ?timeout, "prompting for missing property values");

    let result =
        deadline::run_with_deadline(timeout, &cancel, move |c| prompter.present(&entries, c));

    match result {
        DeadlineResult::Completed(Ok(PromptOutcome::Accepted(values))) => {
            for (name, value) in values {
                store.set(name, value);
            }
            store.persist_unlocked()?;
            Ok(FillOutcome::Applied)
        }
        DeadlineResult::Completed(Ok(PromptOutcome::Declined)) => {
            debug!("prompt declined; missing values stay absent");
            Ok(FillOutcome::Declined)
        }
        DeadlineResult::Completed(Err(e)) => {
            warn!(error = %e, "prompter failed; missing values stay absent");
            Ok(FillOutcome::Failed)
        }
        DeadlineResult::TimedOut => {
            let reported = PropfillError::PromptTimeout(timeout);
            warn!(error = %reported, "missing values stay absent");
            Ok(FillOutcome::TimedOut)
        }
        DeadlineResult::Failed => {
            warn!("prompter task ended without a result; missing values stay absent");
            Ok(FillOutcome::Failed)
        }
    }
}
