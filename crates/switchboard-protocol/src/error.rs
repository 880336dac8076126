//! Errors surfaced by registry operations.

use thiserror::Error;

use crate::sink::DispatchError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Context name failed validation. Rejected before any registry mutation.
    #[error("invalid context name: {0:?}")]
    InvalidName(String),

    /// Context path failed validation (must be non-empty and start with `/`).
    /// Rejected before any registry mutation.
    #[error("invalid context path: {0:?}")]
    InvalidPath(String),

    /// The dispatch sink refused a register call issued while applying the
    /// operation. The logical registration stands — the registry was already
    /// mutated — so the caller decides whether to roll back with the
    /// matching remove. The engine's registry snapshot locates the divergent
    /// registration if the handle was lost with the error.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
