//! Switchboard — dynamic binding of request-handling endpoints to named,
//! priority-ranked execution contexts.
//!
//! Contexts and endpoints register and deregister independently, at any
//! time, from unrelated lifecycles. The [`BindingEngine`] keeps the picture
//! consistent: each context name has exactly one active candidate (highest
//! rank wins, earlier registration breaks ties), endpoints bind to the
//! active candidates their predicates match, and an external
//! [`DispatchSink`] is driven in lockstep — deactivate fully, then activate —
//! so no two candidates ever serve one name at once.
//!
//! ```
//! use std::sync::Arc;
//! use switchboard::{
//!     BindingEngine, ContextInfo, ContextTarget, DispatchError, DispatchSink, EndpointInfo,
//!     EndpointTarget, named,
//! };
//!
//! struct NullSink;
//!
//! impl DispatchSink for NullSink {
//!     fn register(
//!         &self,
//!         _context: &ContextTarget<'_>,
//!         _prefix: Option<&str>,
//!         _endpoint: &EndpointTarget<'_>,
//!     ) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//!     fn unregister(&self, _endpoint: &EndpointTarget<'_>) {}
//! }
//!
//! let engine = BindingEngine::new(Arc::new(NullSink));
//! let context = engine.add_context(ContextInfo::new("svc", "/svc", 10)).unwrap();
//! let endpoint = engine.add_endpoint(EndpointInfo::new(named("svc"))).unwrap();
//!
//! assert_eq!(engine.snapshot().endpoints[0].bound_contexts, vec![context.id()]);
//!
//! engine.remove_endpoint(&endpoint);
//! engine.remove_context(&context).unwrap();
//! ```

pub use switchboard_engine::{
    BindingEngine, ContextSnapshot, DEFAULT_CONTEXT_NAME, EndpointSnapshot, RegistrySnapshot,
};
pub use switchboard_protocol::{
    BindError, ContextHandle, ContextInfo, ContextPredicate, ContextTarget, DispatchError,
    DispatchSink, EndpointHandle, EndpointInfo, EndpointTarget, named,
};
