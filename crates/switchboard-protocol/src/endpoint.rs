//! Endpoint descriptors — a request handler plus the predicate that selects
//! which contexts it attaches to.

use std::fmt;
use std::sync::Arc;

use crate::predicate::ContextPredicate;

/// Declared properties of an endpoint registration.
///
/// The predicate decides which active contexts the endpoint binds to. The
/// optional fixed prefix travels with the registration and is visible to the
/// dispatch sink; the prefix argument of a register call is always the one
/// derived from the bound context's path.
#[derive(Clone)]
pub struct EndpointInfo {
    pub predicate: Arc<dyn ContextPredicate>,
    pub prefix: Option<String>,
}

impl EndpointInfo {
    pub fn new(predicate: impl ContextPredicate + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
            prefix: None,
        }
    }

    /// Set a fixed target prefix for this endpoint.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl fmt::Debug for EndpointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointInfo")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// The view of an endpoint registration the dispatch sink sees.
#[derive(Debug, Clone, Copy)]
pub struct EndpointTarget<'a> {
    pub id: u64,
    pub prefix: Option<&'a str>,
}
