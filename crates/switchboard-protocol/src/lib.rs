//! Switchboard shared types.
//!
//! Everything the binding engine and its collaborators exchange lives here:
//! the context/endpoint descriptors, the opaque handles minted on
//! registration, the `ContextPredicate` and `DispatchSink` capability traits,
//! and the error types. No binding logic — that belongs to
//! `switchboard-engine`.

pub mod context;
pub mod endpoint;
pub mod error;
pub mod handle;
pub mod predicate;
pub mod sink;

pub use context::{ContextInfo, ContextTarget};
pub use endpoint::{EndpointInfo, EndpointTarget};
pub use error::BindError;
pub use handle::{ContextHandle, EndpointHandle};
pub use predicate::{ContextPredicate, named};
pub use sink::{DispatchError, DispatchSink};
