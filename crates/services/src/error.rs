//! Shared error types for the services crate.

use thiserror::Error;

use kana_core::selection::SelectionError;
use storage::StorageError;

/// Errors emitted by practice sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not started; draw an item first")]
    NotStarted,
    #[error("session already completed")]
    Completed,
    #[error("no prompt is waiting for an answer")]
    NoPendingPrompt,
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
