//! Switchboard binding engine.
//!
//! Resolves which execution contexts each endpoint is attached to and keeps
//! an external [`DispatchSink`] synchronized as contexts and endpoints
//! register and deregister concurrently. Each context *name* has exactly one
//! authoritative candidate at a time, chosen by rank with registration order
//! as the tiebreak; lower-ranked candidates wait as standbys and take over
//! automatically when the active one departs.
//!
//! [`DispatchSink`]: switchboard_protocol::DispatchSink

mod candidate;
mod engine;
mod registry;
mod snapshot;

pub use engine::{BindingEngine, DEFAULT_CONTEXT_NAME};
pub use snapshot::{ContextSnapshot, EndpointSnapshot, RegistrySnapshot};
