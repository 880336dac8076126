//! Selection predicates — the capability each endpoint supplies to decide
//! which contexts it is eligible for.
//!
//! The predicate is opaque to the engine: any side-effect-free boolean
//! function over a [`ContextTarget`] works, from a simple name check to a
//! compiled expression evaluator. No predicate language is parsed here.

use crate::context::ContextTarget;

/// Decides whether an endpoint is eligible for a given context.
///
/// Must be pure: the engine may evaluate it any number of times, in any
/// order, while holding its internal lock. Implementations must not call
/// back into the registry.
pub trait ContextPredicate: Send + Sync {
    fn matches(&self, target: &ContextTarget<'_>) -> bool;
}

impl<F> ContextPredicate for F
where
    F: for<'a> Fn(&ContextTarget<'a>) -> bool + Send + Sync,
{
    fn matches(&self, target: &ContextTarget<'_>) -> bool {
        self(target)
    }
}

/// Predicate selecting contexts by exact declared name — the common case for
/// endpoints that target one specific context.
pub fn named(name: impl Into<String>) -> impl ContextPredicate {
    let name = name.into();
    move |target: &ContextTarget<'_>| target.name == name
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn target<'a>(name: &'a str, attributes: &'a BTreeMap<String, serde_json::Value>) -> ContextTarget<'a> {
        ContextTarget {
            id: 1,
            name,
            path: "/",
            rank: 0,
            attributes,
        }
    }

    #[test]
    fn named_matches_exact_name() {
        let attrs = BTreeMap::new();
        let p = named("svc");
        assert!(p.matches(&target("svc", &attrs)));
        assert!(!p.matches(&target("other", &attrs)));
    }

    #[test]
    fn closures_are_predicates() {
        let attrs: BTreeMap<String, serde_json::Value> =
            [("tier".to_string(), serde_json::json!("gold"))].into();
        let p = |t: &ContextTarget<'_>| t.attributes.get("tier") == Some(&serde_json::json!("gold"));
        assert!(p.matches(&target("svc", &attrs)));

        let empty = BTreeMap::new();
        assert!(!p.matches(&target("svc", &empty)));
    }
}
