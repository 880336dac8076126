//! Context candidates and the priority order that picks the active one.

use std::cmp::Ordering;

use switchboard_protocol::{ContextInfo, ContextTarget};

/// One registered context competing for its declared name.
///
/// Immutable once created. The id doubles as the registration sequence
/// number: ids are minted from a monotonic counter, so ordering by id is
/// ordering by registration time.
#[derive(Debug)]
pub(crate) struct ContextCandidate {
    id: u64,
    info: ContextInfo,
    prefix: Option<String>,
}

impl ContextCandidate {
    pub fn new(id: u64, info: ContextInfo) -> Self {
        let prefix = info.prefix();
        Self { id, info, prefix }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn rank(&self) -> i32 {
        self.info.rank
    }

    pub fn info(&self) -> &ContextInfo {
        &self.info
    }

    /// Prefix derived from the declared path; `None` for the root path.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn target(&self) -> ContextTarget<'_> {
        ContextTarget {
            id: self.id,
            name: &self.info.name,
            path: &self.info.path,
            rank: self.info.rank,
            attributes: &self.info.attributes,
        }
    }
}

/// Higher rank first; equal ranks fall back to registration order, earlier
/// wins. Ids are unique, so the order is strict: no two distinct candidates
/// compare equal and head selection is deterministic.
impl Ord for ContextCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .info
            .rank
            .cmp(&self.info.rank)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for ContextCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ContextCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContextCandidate {}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, rank: i32) -> ContextCandidate {
        ContextCandidate::new(id, ContextInfo::new("svc", "/svc", rank))
    }

    #[test]
    fn higher_rank_sorts_first() {
        let mut seq = vec![candidate(1, 10), candidate(2, 20)];
        seq.sort();
        assert_eq!(seq[0].id(), 2);
        assert_eq!(seq[1].id(), 1);
    }

    #[test]
    fn equal_rank_breaks_tie_by_registration_order() {
        let mut seq = vec![candidate(7, 10), candidate(3, 10), candidate(5, 10)];
        seq.sort();
        let ids: Vec<u64> = seq.iter().map(ContextCandidate::id).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn order_is_strict() {
        let a = candidate(1, 10);
        let b = candidate(2, 10);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a, b);
    }
}
