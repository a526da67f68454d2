use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PropfillError>;

#[derive(Debug, Error)]
pub enum PropfillError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed properties text: {0}")]
    Parse(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Timed out after {0:?} waiting for the prompter")]
    PromptTimeout(Duration),

    #[error("Prompter failed: {0}")]
    Prompt(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
