//! Dispatch sink — the external layer that physically attaches and detaches
//! endpoints under an active context.

use thiserror::Error;

use crate::context::ContextTarget;
use crate::endpoint::EndpointTarget;

/// Errors a dispatch sink may return from a register call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The target prefix is already claimed by another registration.
    #[error("prefix already in use: {prefix}")]
    Conflict { prefix: String },
    /// The sink refused the registration for some other reason.
    #[error("registration rejected: {0}")]
    Rejected(String),
}

/// The physical attach/detach layer the binding engine drives.
///
/// Calls are issued while the engine's lock is held, so implementations must
/// be fast, must not block indefinitely, and must never call back into the
/// registry. A register error propagates to whoever triggered the mutation;
/// the engine keeps its logical state and never retries.
pub trait DispatchSink: Send + Sync {
    /// Attach `endpoint` under `context`. `prefix` is derived from the
    /// context's declared path; `None` for the root path.
    fn register(
        &self,
        context: &ContextTarget<'_>,
        prefix: Option<&str>,
        endpoint: &EndpointTarget<'_>,
    ) -> Result<(), DispatchError>;

    /// Detach `endpoint`. Infallible: detaching is teardown and teardown
    /// does not fail.
    fn unregister(&self, endpoint: &EndpointTarget<'_>);
}
