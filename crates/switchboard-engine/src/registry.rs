//! Registry state — the maps behind the engine's single lock.
//!
//! `contexts` and `endpoints` are the authoritative registries; `bindings`
//! is the cache of which candidates each endpoint is currently bound to.
//! A binding entry whose set empties is dropped from the cache, but the
//! registration in `endpoints` stays live and is reconsidered by the next
//! activation.

use std::collections::HashMap;
use std::sync::Arc;

use switchboard_protocol::{ContextPredicate, EndpointInfo, EndpointTarget};

use crate::candidate::ContextCandidate;

/// A live endpoint registration.
#[derive(Debug)]
pub(crate) struct EndpointEntry {
    pub id: u64,
    pub info: EndpointInfo,
}

impl EndpointEntry {
    pub fn target(&self) -> EndpointTarget<'_> {
        EndpointTarget {
            id: self.id,
            prefix: self.info.prefix.as_deref(),
        }
    }
}

/// Outcome of inserting a candidate into its name sequence.
pub(crate) enum InsertedContext {
    /// The candidate sorted to the head and is now active. `displaced` is
    /// the previous head, if the sequence had one.
    Active {
        displaced: Option<Arc<ContextCandidate>>,
    },
    /// The candidate sorted below the head and waits as a standby.
    Standby,
}

/// Outcome of removing a candidate from its name sequence.
pub(crate) struct RemovedContext {
    pub removed: Arc<ContextCandidate>,
    pub was_active: bool,
    /// The standby promoted to the head, if the removed candidate was active
    /// and the sequence is non-empty afterward.
    pub successor: Option<Arc<ContextCandidate>>,
}

#[derive(Default)]
pub(crate) struct RegistryState {
    /// name → candidates, sorted most authoritative first. Index 0 is the
    /// active candidate; the key is removed with its last candidate.
    pub contexts: HashMap<String, Vec<Arc<ContextCandidate>>>,
    /// Every live endpoint registration, keyed by handle id.
    pub endpoints: HashMap<u64, Arc<EndpointEntry>>,
    /// Cached binding sets, keyed by endpoint id. Never holds an empty set.
    pub bindings: HashMap<u64, Vec<Arc<ContextCandidate>>>,
}

impl RegistryState {
    /// Insert `candidate` into its name sequence, keeping the sequence
    /// sorted.
    pub fn insert_candidate(&mut self, candidate: Arc<ContextCandidate>) -> InsertedContext {
        let seq = self.contexts.entry(candidate.name().to_owned()).or_default();
        seq.push(Arc::clone(&candidate));
        seq.sort();
        if Arc::ptr_eq(&seq[0], &candidate) {
            InsertedContext::Active {
                displaced: seq.get(1).cloned(),
            }
        } else {
            InsertedContext::Standby
        }
    }

    /// Remove the candidate with `id` from the sequence for `name`.
    /// Returns `None` if the registry does not know it.
    pub fn remove_candidate(&mut self, name: &str, id: u64) -> Option<RemovedContext> {
        let seq = self.contexts.get_mut(name)?;
        let pos = seq.iter().position(|c| c.id() == id)?;
        let removed = seq.remove(pos);
        let was_active = pos == 0;
        let successor = if was_active { seq.first().cloned() } else { None };
        if seq.is_empty() {
            self.contexts.remove(name);
        }
        Some(RemovedContext {
            removed,
            was_active,
            successor,
        })
    }

    /// The active candidate of every name whose active candidate satisfies
    /// `predicate`, in registration order for reproducible dispatch.
    pub fn matching_active(&self, predicate: &dyn ContextPredicate) -> Vec<Arc<ContextCandidate>> {
        let mut matched: Vec<Arc<ContextCandidate>> = self
            .contexts
            .values()
            .filter_map(|seq| seq.first())
            .filter(|candidate| predicate.matches(&candidate.target()))
            .cloned()
            .collect();
        matched.sort_by_key(|candidate| candidate.id());
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_protocol::{ContextInfo, named};

    fn candidate(id: u64, name: &str, rank: i32) -> Arc<ContextCandidate> {
        Arc::new(ContextCandidate::new(
            id,
            ContextInfo::new(name, format!("/{name}{id}"), rank),
        ))
    }

    #[test]
    fn first_candidate_becomes_active_with_nothing_displaced() {
        let mut state = RegistryState::default();
        match state.insert_candidate(candidate(1, "svc", 10)) {
            InsertedContext::Active { displaced } => assert!(displaced.is_none()),
            InsertedContext::Standby => panic!("sole candidate must be active"),
        }
    }

    #[test]
    fn higher_rank_displaces_the_head() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 10));
        match state.insert_candidate(candidate(2, "svc", 20)) {
            InsertedContext::Active { displaced } => {
                assert_eq!(displaced.unwrap().id(), 1);
            }
            InsertedContext::Standby => panic!("higher rank must take over"),
        }
    }

    #[test]
    fn lower_rank_joins_as_standby() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 20));
        assert!(matches!(
            state.insert_candidate(candidate(2, "svc", 10)),
            InsertedContext::Standby
        ));
    }

    #[test]
    fn removing_the_head_names_a_successor() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 10));
        state.insert_candidate(candidate(2, "svc", 20));

        let removed = state.remove_candidate("svc", 2).unwrap();
        assert!(removed.was_active);
        assert_eq!(removed.successor.unwrap().id(), 1);
    }

    #[test]
    fn removing_a_standby_promotes_nothing() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 10));
        state.insert_candidate(candidate(2, "svc", 20));

        let removed = state.remove_candidate("svc", 1).unwrap();
        assert!(!removed.was_active);
        assert!(removed.successor.is_none());
    }

    #[test]
    fn last_removal_deletes_the_name_entry() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 10));
        state.remove_candidate("svc", 1).unwrap();
        assert!(!state.contexts.contains_key("svc"));
    }

    #[test]
    fn unknown_candidate_removal_returns_none() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 10));
        assert!(state.remove_candidate("svc", 99).is_none());
        assert!(state.remove_candidate("other", 1).is_none());
    }

    #[test]
    fn matching_active_sees_only_heads() {
        let mut state = RegistryState::default();
        state.insert_candidate(candidate(1, "svc", 10));
        state.insert_candidate(candidate(2, "svc", 20));
        state.insert_candidate(candidate(3, "other", 0));

        let svc = state.matching_active(&named("svc"));
        assert_eq!(svc.len(), 1);
        assert_eq!(svc[0].id(), 2);

        let all = state.matching_active(&|_: &switchboard_protocol::ContextTarget<'_>| true);
        let ids: Vec<u64> = all.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
