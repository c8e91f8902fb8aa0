//! The per-request subset of a chain whose resources are present.

use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::Serialize;
use utoipa::ToSchema;

use crate::naming::NamingPolicy;

use super::chain::ResourceChain;
use super::kind::ResourceKind;
use super::params::Params;

/// Active resources for one request, in chain order.
///
/// Always contains the primary resource. A non-primary kind is active when
/// its finder parameter is present and non-blank.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct ActiveSet(Vec<ResourceKind>);

impl ActiveSet {
    /// Classify each kind in `chain` against `params`, using the finder
    /// parameter `naming` assigns to each kind.
    pub fn classify(chain: &ResourceChain, params: &Params, naming: &NamingPolicy) -> Self {
        let kinds = chain
            .iter()
            .filter(|kind| {
                chain.is_primary(kind.as_str())
                    || naming
                        .get(kind.as_str())
                        .is_some_and(|n| params.is_present(n.finder_param()))
            })
            .cloned()
            .collect();
        Self(kinds)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.position(kind).is_some()
    }

    pub fn position(&self, kind: &str) -> Option<usize> {
        self.0.iter().position(|k| k.as_str() == kind)
    }

    /// Active kinds strictly outside `kind`, outer first.
    ///
    /// Returns `None` when `kind` itself is not active.
    pub fn ancestors_of(&self, kind: &str) -> Option<&[ResourceKind]> {
        self.position(kind).map(|idx| &self.0[..idx])
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

    pub fn as_slice(&self) -> &[ResourceKind] {
        &self.0
    }
}

impl Display for ActiveSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}
