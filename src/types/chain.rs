//! The declared, ordered chain of resource kinds.

use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ResourceError;

use super::kind::ResourceKind;

/// Outer-to-inner ordering of the resources a controller works with.
///
/// Invariants: non-empty, no blank kinds, no duplicates. The last entry is
/// the primary resource, the one the controller acts upon.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct ResourceChain(Vec<ResourceKind>);

impl ResourceChain {
    pub fn new<I, K>(kinds: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ResourceKind>,
    {
        let kinds: Vec<ResourceKind> = kinds.into_iter().map(Into::into).collect();
        if kinds.is_empty() {
            return Err(ResourceError::EmptyChain);
        }

        let mut seen = HashSet::with_capacity(kinds.len());
        for kind in &kinds {
            if kind.is_blank() {
                return Err(ResourceError::BlankKind);
            }
            if !seen.insert(kind.as_str()) {
                return Err(ResourceError::DuplicateKind(kind.to_string()));
            }
        }

        Ok(Self(kinds))
    }

    /// The innermost resource; always active.
    pub fn primary(&self) -> &ResourceKind {
        // Non-empty by construction.
        &self.0[self.0.len() - 1]
    }

    pub fn is_primary(&self, kind: &str) -> bool {
        self.primary().as_str() == kind
    }

    pub fn position(&self, kind: &str) -> Option<usize> {
        self.0.iter().position(|k| k.as_str() == kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.position(kind).is_some()
    }

    pub fn get(&self, kind: &str) -> Option<&ResourceKind> {
        self.0.iter().find(|k| k.as_str() == kind)
    }

    /// Kinds strictly outside `kind`, outer first.
    pub fn outer_of(&self, kind: &str) -> &[ResourceKind] {
        match self.position(kind) {
            Some(idx) => &self.0[..idx],
            None => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceKind> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ResourceChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.iter().join(" > "))
    }
}

impl<'a> IntoIterator for &'a ResourceChain {
    type Item = &'a ResourceKind;
    type IntoIter = std::slice::Iter<'a, ResourceKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_primary_is_last() {
        let chain = ResourceChain::new(["collection", "category", "item"]).unwrap();
        assert_eq!(chain.primary().as_str(), "item");
        assert!(chain.is_primary("item"));
        assert!(!chain.is_primary("category"));
    }

    #[parameterized(
        empty = { vec![], ResourceError::EmptyChain },
        blank = { vec!["collection", " "], ResourceError::BlankKind },
        duplicate = { vec!["item", "category", "item"], ResourceError::DuplicateKind("item".into()) },
    )]
    fn test_invalid_chain(kinds: Vec<&str>, expected: ResourceError) {
        let err = ResourceChain::new(kinds).unwrap_err();
        assert_eq!(err, expected);
        assert!(err.is_configuration());
    }

    #[test]
    fn test_outer_of() {
        let chain = ResourceChain::new(["collection", "category", "item"]).unwrap();
        let outer: Vec<&str> = chain.outer_of("item").iter().map(|k| k.as_str()).collect();
        assert_eq!(outer, vec!["collection", "category"]);
        assert!(chain.outer_of("collection").is_empty());
        assert!(chain.outer_of("unknown").is_empty());
    }

    #[test]
    fn test_display() {
        let chain = ResourceChain::new(["collection", "category", "item"]).unwrap();
        insta::assert_snapshot!(chain.to_string(), @"collection > category > item");
    }
}
