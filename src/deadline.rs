//! Run a task on its own thread and wait at most a deadline for the result.
//!
//! The prompt workflow is the only cancellable wait in the crate: a hung
//! prompter must not starve the caller beyond the configured timeout. On
//! expiry the shared [`CancelFlag`] is raised and any late result is
//! discarded along with the channel.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::prompt::CancelFlag;

#[derive(Debug)]
pub(crate) enum DeadlineResult<T> {
    Completed(T),
    TimedOut,
    /// The worker thread went away without producing a result (panic or
    /// failure to spawn).
    Failed,
}

pub(crate) fn run_with_deadline<T, F>(
    timeout: Duration,
    cancel: &CancelFlag,
    task: F,
) -> DeadlineResult<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelFlag) -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let worker_cancel = cancel.clone();

    let spawned = thread::Builder::new()
        .name("propfill-prompt".into())
        .spawn(move || {
            let result = task(&worker_cancel);
            // The receiver is gone if we timed out; a late result is dropped here.
            let _ = tx.send(result);
        });
    if spawned.is_err() {
        return DeadlineResult::Failed;
    }

    match rx.recv_timeout(timeout) {
        Ok(value) => DeadlineResult::Completed(value),
        Err(RecvTimeoutError::Timeout) => {
            cancel.cancel();
            DeadlineResult::TimedOut
        }
        Err(RecvTimeoutError::Disconnected) => DeadlineResult::Failed,
    }
}
