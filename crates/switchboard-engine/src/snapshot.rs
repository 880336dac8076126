//! Read-only registry views for administrative display.
//!
//! Snapshots are plain serializable data, detached from the live registries:
//! whatever renders them (a console, a status endpoint) stays outside this
//! crate.

use serde::Serialize;

use crate::registry::RegistryState;

/// One registered context candidate as seen at capture time.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSnapshot {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub rank: i32,
    /// Whether this candidate is the authoritative one for its name.
    pub active: bool,
}

/// One registered endpoint and the context ids it is bound to.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointSnapshot {
    pub id: u64,
    pub prefix: Option<String>,
    pub bound_contexts: Vec<u64>,
}

/// Point-in-time view of both registries.
///
/// Contexts are grouped by name (names sorted) in priority order, so the
/// first entry of each name is its active candidate. Endpoints are sorted by
/// registration order.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub contexts: Vec<ContextSnapshot>,
    pub endpoints: Vec<EndpointSnapshot>,
}

impl RegistrySnapshot {
    pub(crate) fn capture(state: &RegistryState) -> Self {
        let mut names: Vec<&String> = state.contexts.keys().collect();
        names.sort();

        let mut contexts = Vec::new();
        for name in names {
            for (pos, candidate) in state.contexts[name].iter().enumerate() {
                contexts.push(ContextSnapshot {
                    id: candidate.id(),
                    name: candidate.name().to_string(),
                    path: candidate.info().path.clone(),
                    rank: candidate.rank(),
                    active: pos == 0,
                });
            }
        }

        let mut endpoints: Vec<EndpointSnapshot> = state
            .endpoints
            .values()
            .map(|entry| {
                let mut bound_contexts: Vec<u64> = state
                    .bindings
                    .get(&entry.id)
                    .map(|set| set.iter().map(|c| c.id()).collect())
                    .unwrap_or_default();
                bound_contexts.sort_unstable();
                EndpointSnapshot {
                    id: entry.id,
                    prefix: entry.info.prefix.clone(),
                    bound_contexts,
                }
            })
            .collect();
        endpoints.sort_by_key(|endpoint| endpoint.id);

        Self { contexts, endpoints }
    }
}
