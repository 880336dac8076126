//! Context descriptors — the declared identity a context registers under.
//!
//! A [`ContextInfo`] is validated once, before the registry is touched, and
//! never mutated afterwards. The URL prefix an endpoint is served under is
//! derived from the declared path; the root path `/` yields no prefix.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::BindError;

/// Declared properties of an execution context.
///
/// `name` groups competing candidates: all contexts registered under the same
/// name contend for it, and the highest-ranked one is active. `attributes`
/// is an opaque bag that selection predicates may match against.
#[derive(Debug, Clone, Serialize)]
pub struct ContextInfo {
    pub name: String,
    pub path: String,
    pub rank: i32,
    pub attributes: BTreeMap<String, Value>,
}

impl ContextInfo {
    pub fn new(name: impl Into<String>, path: impl Into<String>, rank: i32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            rank,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach an attribute for predicates to match against.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Reject malformed descriptors before any registry mutation.
    pub fn validate(&self) -> Result<(), BindError> {
        if self.name.trim().is_empty() {
            return Err(BindError::InvalidName(self.name.clone()));
        }
        if self.path.is_empty() || !self.path.starts_with('/') {
            return Err(BindError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }

    /// URL prefix derived from the declared path.
    ///
    /// The root path `/` yields no prefix; any other path yields the path
    /// with trailing slashes removed (`"/a/"` → `"/a"`).
    pub fn prefix(&self) -> Option<String> {
        if self.path == "/" {
            None
        } else {
            Some(self.path.trim_end_matches('/').to_string())
        }
    }
}

/// The view of a registered context that predicates and the dispatch sink
/// see: the opaque identity plus the declared properties.
#[derive(Debug, Clone, Copy)]
pub struct ContextTarget<'a> {
    pub id: u64,
    pub name: &'a str,
    pub path: &'a str,
    pub rank: i32,
    pub attributes: &'a BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_yields_no_prefix() {
        let info = ContextInfo::new("default", "/", 0);
        assert_eq!(info.prefix(), None);
    }

    #[test]
    fn prefix_strips_trailing_slash() {
        assert_eq!(ContextInfo::new("a", "/a", 0).prefix().as_deref(), Some("/a"));
        assert_eq!(ContextInfo::new("a", "/a/", 0).prefix().as_deref(), Some("/a"));
        assert_eq!(ContextInfo::new("a", "/a/b/", 0).prefix().as_deref(), Some("/a/b"));
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            ContextInfo::new("", "/a", 0).validate(),
            Err(BindError::InvalidName(_))
        ));
        assert!(matches!(
            ContextInfo::new("   ", "/a", 0).validate(),
            Err(BindError::InvalidName(_))
        ));
    }

    #[test]
    fn relative_path_rejected() {
        assert!(matches!(
            ContextInfo::new("svc", "a/b", 0).validate(),
            Err(BindError::InvalidPath(_))
        ));
        assert!(matches!(
            ContextInfo::new("svc", "", 0).validate(),
            Err(BindError::InvalidPath(_))
        ));
    }

    #[test]
    fn valid_descriptor_passes() {
        assert!(ContextInfo::new("svc", "/svc", 10).validate().is_ok());
    }
}
