//! Opaque handles minted by the binding engine on registration.
//!
//! A handle is the only way to remove what was added. Removal with a handle
//! the registry no longer knows is a no-op, keeping teardown idempotent.

use serde::Serialize;

/// Handle to a registered context candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContextHandle {
    id: u64,
    name: String,
}

impl ContextHandle {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The declared name the candidate was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to a registered endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EndpointHandle {
    id: u64,
}

impl EndpointHandle {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}
