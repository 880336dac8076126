//! The binding engine — sole mutator of the registries, driver of the
//! dispatch sink.
//!
//! Every public operation takes the single lock once and completes fully
//! inside it, sink calls included, so concurrent callers always observe a
//! name with exactly one active candidate and never a partially updated
//! binding set. Within one operation, deactivation of an outgoing active
//! candidate finishes (all its endpoints unregistered) before activation of
//! the incoming one begins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use switchboard_protocol::{
    BindError, ContextHandle, ContextInfo, DispatchError, DispatchSink, EndpointHandle,
    EndpointInfo,
};
use tracing::{debug, info, warn};

use crate::candidate::ContextCandidate;
use crate::registry::{EndpointEntry, InsertedContext, RegistryState};
use crate::snapshot::RegistrySnapshot;

/// Name of the context seeded at engine construction.
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// Binds endpoints to named, priority-ranked execution contexts and keeps an
/// external [`DispatchSink`] synchronized as both come and go.
pub struct BindingEngine {
    sink: Arc<dyn DispatchSink>,
    state: Mutex<RegistryState>,
    next_id: AtomicU64,
    default_context: ContextHandle,
}

impl BindingEngine {
    /// Create an engine driving `sink`, seeded with the built-in default
    /// context (name `"default"`, path `/`, rank 0). The default context
    /// participates in priority and failover like any other candidate; a
    /// higher-ranked registration under the same name shadows it.
    pub fn new(sink: Arc<dyn DispatchSink>) -> Self {
        let mut state = RegistryState::default();
        let default = Arc::new(ContextCandidate::new(
            0,
            ContextInfo::new(DEFAULT_CONTEXT_NAME, "/", 0),
        ));
        // No endpoints exist yet, so seeding cannot trigger sink calls.
        state.insert_candidate(default);

        info!("Binding engine created with default context '{DEFAULT_CONTEXT_NAME}'");
        Self {
            sink,
            state: Mutex::new(state),
            next_id: AtomicU64::new(1),
            default_context: ContextHandle::new(0, DEFAULT_CONTEXT_NAME),
        }
    }

    /// Handle of the built-in default context.
    pub fn default_context(&self) -> ContextHandle {
        self.default_context.clone()
    }

    /// Register a context candidate.
    ///
    /// If the candidate outranks the current head for its name, the old head
    /// is deactivated first and the candidate activated in its place;
    /// otherwise it joins as a standby and nothing else changes.
    ///
    /// A [`BindError::Dispatch`] means the candidate is registered and
    /// logically bound but some sink register call failed; the caller may
    /// roll back with [`remove_context`](Self::remove_context).
    pub fn add_context(&self, info: ContextInfo) -> Result<ContextHandle, BindError> {
        info.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let candidate = Arc::new(ContextCandidate::new(id, info));
        let handle = ContextHandle::new(id, candidate.name());

        let mut state = self.state.lock();
        match state.insert_candidate(Arc::clone(&candidate)) {
            InsertedContext::Active { displaced } => {
                info!(
                    "Context registered: '{}' (id: {}, rank: {}), taking over as active",
                    candidate.name(),
                    id,
                    candidate.rank()
                );
                if let Some(previous) = displaced {
                    self.deactivate(&mut state, &previous);
                }
                self.activate(&mut state, &candidate)?;
            }
            InsertedContext::Standby => {
                info!(
                    "Context registered: '{}' (id: {}, rank: {}), standing by",
                    candidate.name(),
                    id,
                    candidate.rank()
                );
            }
        }
        Ok(handle)
    }

    /// Deregister a context candidate. Unknown handles are a no-op.
    ///
    /// Removing the active candidate deactivates it (all its endpoints are
    /// unregistered from the sink) and then activates the highest-ranked
    /// standby, if any, in the same step.
    pub fn remove_context(&self, handle: &ContextHandle) -> Result<(), BindError> {
        let mut state = self.state.lock();
        let Some(outcome) = state.remove_candidate(handle.name(), handle.id()) else {
            warn!(
                "Remove for unknown context handle '{}' (id: {}), ignoring",
                handle.name(),
                handle.id()
            );
            return Ok(());
        };

        if outcome.was_active {
            info!(
                "Active context removed: '{}' (id: {})",
                outcome.removed.name(),
                outcome.removed.id()
            );
            self.deactivate(&mut state, &outcome.removed);
            if let Some(successor) = outcome.successor {
                info!(
                    "Standby promoted: '{}' (id: {}, rank: {})",
                    successor.name(),
                    successor.id(),
                    successor.rank()
                );
                self.activate(&mut state, &successor)?;
            }
        } else {
            info!(
                "Standby context removed: '{}' (id: {})",
                outcome.removed.name(),
                outcome.removed.id()
            );
        }
        Ok(())
    }

    /// Register an endpoint.
    ///
    /// The endpoint binds to the active candidate of every name its
    /// predicate matches; one sink register call is issued per binding. An
    /// endpoint matching nothing is still registered and will bind when a
    /// matching context activates later.
    ///
    /// A [`BindError::Dispatch`] means the endpoint is registered and
    /// logically bound but some sink register call failed; the caller may
    /// roll back with [`remove_endpoint`](Self::remove_endpoint).
    pub fn add_endpoint(&self, info: EndpointInfo) -> Result<EndpointHandle, BindError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(EndpointEntry { id, info });

        let mut state = self.state.lock();
        let matched = state.matching_active(entry.info.predicate.as_ref());
        state.endpoints.insert(id, Arc::clone(&entry));
        if !matched.is_empty() {
            state.bindings.insert(id, matched.clone());
        }
        info!("Endpoint registered: id {} ({} binding(s))", id, matched.len());

        let mut first_error: Option<DispatchError> = None;
        for candidate in &matched {
            debug!(
                "Endpoint {} bound to context '{}' (id: {})",
                id,
                candidate.name(),
                candidate.id()
            );
            if let Err(error) =
                self.sink
                    .register(&candidate.target(), candidate.prefix(), &entry.target())
            {
                warn!(
                    "Dispatch sink rejected endpoint {} under context '{}': {}",
                    id,
                    candidate.name(),
                    error
                );
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            None => Ok(EndpointHandle::new(id)),
            Some(error) => Err(error.into()),
        }
    }

    /// Deregister an endpoint, unregistering it from the sink once per
    /// candidate it was bound to. Unknown handles are a no-op.
    pub fn remove_endpoint(&self, handle: &EndpointHandle) {
        let mut state = self.state.lock();
        let Some(entry) = state.endpoints.remove(&handle.id()) else {
            warn!("Remove for unknown endpoint handle {}, ignoring", handle.id());
            return;
        };
        let bound = state.bindings.remove(&handle.id()).unwrap_or_default();
        for candidate in &bound {
            debug!(
                "Endpoint {} unbound from context '{}' (id: {})",
                entry.id,
                candidate.name(),
                candidate.id()
            );
            self.sink.unregister(&entry.target());
        }
        info!("Endpoint removed: id {} ({} binding(s) released)", entry.id, bound.len());
    }

    /// Tear the engine down: unregister every cached binding from the sink
    /// and clear the registries, default context included. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        let bindings = std::mem::take(&mut state.bindings);
        let mut entries: Vec<(u64, usize)> =
            bindings.into_iter().map(|(id, set)| (id, set.len())).collect();
        entries.sort_unstable();
        for (id, count) in entries {
            if let Some(entry) = state.endpoints.get(&id) {
                for _ in 0..count {
                    self.sink.unregister(&entry.target());
                }
            }
        }
        state.endpoints.clear();
        state.contexts.clear();
        info!("Binding engine closed");
    }

    /// Read-only view of the registries for administrative display.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.lock();
        RegistrySnapshot::capture(&state)
    }

    /// Bind `candidate` to every live endpoint whose predicate matches it.
    ///
    /// Sweeps all live registrations, not just those with cached bindings: a
    /// set that emptied earlier must be reconsidered here. The logical
    /// mutation completes for every endpoint even when sink calls fail; the
    /// first failure is returned after the sweep.
    fn activate(
        &self,
        state: &mut RegistryState,
        candidate: &Arc<ContextCandidate>,
    ) -> Result<(), BindError> {
        let mut matched: Vec<Arc<EndpointEntry>> = state
            .endpoints
            .values()
            .filter(|entry| entry.info.predicate.matches(&candidate.target()))
            .cloned()
            .collect();
        matched.sort_by_key(|entry| entry.id);

        let mut first_error: Option<DispatchError> = None;
        for entry in &matched {
            state
                .bindings
                .entry(entry.id)
                .or_default()
                .push(Arc::clone(candidate));
            debug!(
                "Endpoint {} bound to context '{}' (id: {})",
                entry.id,
                candidate.name(),
                candidate.id()
            );
            if let Err(error) =
                self.sink
                    .register(&candidate.target(), candidate.prefix(), &entry.target())
            {
                warn!(
                    "Dispatch sink rejected endpoint {} under context '{}': {}",
                    entry.id,
                    candidate.name(),
                    error
                );
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            None => Ok(()),
            Some(error) => Err(error.into()),
        }
    }

    /// Unbind `candidate` from every endpoint currently bound to it, with
    /// one sink unregister call each. Emptied binding sets are dropped from
    /// the cache; the registrations stay live.
    fn deactivate(&self, state: &mut RegistryState, candidate: &Arc<ContextCandidate>) {
        let mut unbound: Vec<u64> = Vec::new();
        state.bindings.retain(|id, set| {
            if let Some(pos) = set.iter().position(|c| Arc::ptr_eq(c, candidate)) {
                set.remove(pos);
                unbound.push(*id);
            }
            !set.is_empty()
        });
        unbound.sort_unstable();

        for id in unbound {
            if let Some(entry) = state.endpoints.get(&id) {
                debug!(
                    "Endpoint {} unbound from context '{}' (id: {})",
                    id,
                    candidate.name(),
                    candidate.id()
                );
                self.sink.unregister(&entry.target());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_protocol::{ContextTarget, EndpointTarget, named};

    struct NullSink;

    impl DispatchSink for NullSink {
        fn register(
            &self,
            _context: &ContextTarget<'_>,
            _prefix: Option<&str>,
            _endpoint: &EndpointTarget<'_>,
        ) -> Result<(), DispatchError> {
            Ok(())
        }

        fn unregister(&self, _endpoint: &EndpointTarget<'_>) {}
    }

    fn engine() -> BindingEngine {
        BindingEngine::new(Arc::new(NullSink))
    }

    #[test]
    fn default_context_is_seeded() {
        let engine = engine();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.contexts.len(), 1);
        assert_eq!(snapshot.contexts[0].name, DEFAULT_CONTEXT_NAME);
        assert!(snapshot.contexts[0].active);
    }

    #[test]
    fn invalid_descriptor_leaves_registry_untouched() {
        let engine = engine();
        assert!(engine.add_context(ContextInfo::new("", "/x", 1)).is_err());
        assert!(engine.add_context(ContextInfo::new("svc", "no-slash", 1)).is_err());
        assert_eq!(engine.snapshot().contexts.len(), 1);
    }

    #[test]
    fn unknown_handles_are_noops() {
        let engine = engine();
        engine.remove_context(&ContextHandle::new(42, "ghost")).unwrap();
        engine.remove_endpoint(&EndpointHandle::new(42));
        assert_eq!(engine.snapshot().contexts.len(), 1);
    }

    #[test]
    fn endpoint_without_match_registers_unbound() {
        let engine = engine();
        let handle = engine.add_endpoint(EndpointInfo::new(named("nowhere"))).unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.endpoints.len(), 1);
        assert!(snapshot.endpoints[0].bound_contexts.is_empty());
        engine.remove_endpoint(&handle);
        assert!(engine.snapshot().endpoints.is_empty());
    }
}
