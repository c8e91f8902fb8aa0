//! Naming conventions for each resource kind.
//!
//! Every name the resolver and route synthesizer use comes from here. The
//! defaults follow the usual conventions (`category` is found through
//! `category_id`, lives in `categories`, routes as `category`), and each
//! value can be replaced per kind with a [`NamingOverrides`] entry. An
//! override replaces the default outright; nothing is merged.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ResourceError;
use crate::inflector::{classify, pluralize, underscore};
use crate::types::{ResourceChain, ResourceKind};

/// Per-kind replacements for the conventional names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct NamingOverrides {
    /// Parameter holding this resource's identifier.
    pub finder_param: Option<String>,
    /// Finder run against the scoped query, e.g. `find_by_slug`.
    pub finder_method: Option<String>,
    /// Named scopes, applied left to right before the finder.
    pub scope_names: Option<Vec<String>>,
    /// Accessor called on the parent object to reach this resource's
    /// collection, e.g. `items`.
    pub parent_collection_accessor: Option<String>,
    /// Backing class used when no parent is active.
    pub backing_class: Option<String>,
    pub route_part: Option<String>,
    pub plural_route_part: Option<String>,
    pub accessor_name: Option<String>,
    pub collection_accessor_name: Option<String>,
    pub object_cache_slot: Option<String>,
    pub collection_cache_slot: Option<String>,
}

impl NamingOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finder_param(mut self, value: impl Into<String>) -> Self {
        self.finder_param = Some(value.into());
        self
    }

    pub fn finder_method(mut self, value: impl Into<String>) -> Self {
        self.finder_method = Some(value.into());
        self
    }

    pub fn scope_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn parent_collection_accessor(mut self, value: impl Into<String>) -> Self {
        self.parent_collection_accessor = Some(value.into());
        self
    }

    pub fn backing_class(mut self, value: impl Into<String>) -> Self {
        self.backing_class = Some(value.into());
        self
    }

    pub fn route_part(mut self, value: impl Into<String>) -> Self {
        self.route_part = Some(value.into());
        self
    }

    pub fn plural_route_part(mut self, value: impl Into<String>) -> Self {
        self.plural_route_part = Some(value.into());
        self
    }

    pub fn accessor_name(mut self, value: impl Into<String>) -> Self {
        self.accessor_name = Some(value.into());
        self
    }

    pub fn collection_accessor_name(mut self, value: impl Into<String>) -> Self {
        self.collection_accessor_name = Some(value.into());
        self
    }

    pub fn object_cache_slot(mut self, value: impl Into<String>) -> Self {
        self.object_cache_slot = Some(value.into());
        self
    }

    pub fn collection_cache_slot(mut self, value: impl Into<String>) -> Self {
        self.collection_cache_slot = Some(value.into());
        self
    }

    /// Name of the first override holding a blank value, if any.
    fn first_blank(&self) -> Option<&'static str> {
        let singles = [
            ("finder_param", &self.finder_param),
            ("finder_method", &self.finder_method),
            ("parent_collection_accessor", &self.parent_collection_accessor),
            ("backing_class", &self.backing_class),
            ("route_part", &self.route_part),
            ("plural_route_part", &self.plural_route_part),
            ("accessor_name", &self.accessor_name),
            ("collection_accessor_name", &self.collection_accessor_name),
            ("object_cache_slot", &self.object_cache_slot),
            ("collection_cache_slot", &self.collection_cache_slot),
        ];
        for (field, value) in singles {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Some(field);
            }
        }
        if let Some(scopes) = &self.scope_names {
            if scopes.iter().any(|s| s.trim().is_empty()) {
                return Some("scope_names");
            }
        }
        None
    }
}

/// The effective names for one resource kind.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ResourceNaming {
    finder_param: String,
    finder_method: String,
    scope_names: Vec<String>,
    parent_collection_accessor: String,
    backing_class: String,
    route_part: String,
    plural_route_part: String,
    accessor_name: String,
    collection_accessor_name: String,
    object_cache_slot: String,
    collection_cache_slot: String,
}

impl ResourceNaming {
    /// Resolve names for `kind`, letting `overrides` replace any default.
    ///
    /// Defaults that derive from another value use that value's effective
    /// form, so overriding `route_part` also moves the default finder
    /// parameter.
    pub fn resolve(kind: &ResourceKind, is_primary: bool, overrides: &NamingOverrides) -> Self {
        let kind = kind.as_str();
        let o = overrides.clone();

        let route_part = o.route_part.unwrap_or_else(|| underscore(kind));
        let plural_route_part = o
            .plural_route_part
            .unwrap_or_else(|| distinct_plural(&route_part, underscore(&pluralize(kind))));
        let finder_param = o.finder_param.unwrap_or_else(|| {
            if is_primary {
                "id".to_string()
            } else {
                format!("{route_part}_id")
            }
        });
        let accessor_name = o.accessor_name.unwrap_or_else(|| underscore(kind));
        let collection_accessor_name = o
            .collection_accessor_name
            .unwrap_or_else(|| distinct_plural(&accessor_name, pluralize(&accessor_name)));

        Self {
            finder_param,
            finder_method: o.finder_method.unwrap_or_else(|| "find".to_string()),
            scope_names: o.scope_names.unwrap_or_default(),
            parent_collection_accessor: o
                .parent_collection_accessor
                .unwrap_or_else(|| pluralize(kind)),
            backing_class: o.backing_class.unwrap_or_else(|| classify(kind)),
            route_part,
            plural_route_part,
            accessor_name,
            collection_accessor_name,
            object_cache_slot: o.object_cache_slot.unwrap_or_else(|| underscore(kind)),
            collection_cache_slot: o
                .collection_cache_slot
                .unwrap_or_else(|| pluralize(&underscore(kind))),
        }
    }

    pub fn finder_param(&self) -> &str {
        &self.finder_param
    }

    pub fn finder_method(&self) -> &str {
        &self.finder_method
    }

    pub fn scope_names(&self) -> &[String] {
        &self.scope_names
    }

    pub fn parent_collection_accessor(&self) -> &str {
        &self.parent_collection_accessor
    }

    pub fn backing_class(&self) -> &str {
        &self.backing_class
    }

    pub fn route_part(&self) -> &str {
        &self.route_part
    }

    pub fn plural_route_part(&self) -> &str {
        &self.plural_route_part
    }

    pub fn accessor_name(&self) -> &str {
        &self.accessor_name
    }

    /// Name of the presence predicate, e.g. `category?`.
    pub fn predicate_name(&self) -> String {
        format!("{}?", self.accessor_name)
    }

    pub fn collection_accessor_name(&self) -> &str {
        &self.collection_accessor_name
    }

    pub fn object_cache_slot(&self) -> &str {
        &self.object_cache_slot
    }

    pub fn collection_cache_slot(&self) -> &str {
        &self.collection_cache_slot
    }
}

/// Uncountable words (`sheep`) get an `_index` plural so that singular and
/// plural names stay apart.
fn distinct_plural(singular: &str, plural: String) -> String {
    if plural == singular {
        format!("{plural}_index")
    } else {
        plural
    }
}

/// Effective naming for every kind of one chain.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NamingPolicy {
    entries: BTreeMap<ResourceKind, ResourceNaming>,
}

impl NamingPolicy {
    /// Resolve naming for `chain`, applying `overrides`.
    ///
    /// Fails when an override names a kind outside the chain or holds a
    /// blank value, or when two kinds end up sharing a cache slot.
    pub fn build(
        chain: &ResourceChain,
        overrides: &HashMap<ResourceKind, NamingOverrides>,
    ) -> Result<Self, ResourceError> {
        for (kind, entry) in overrides {
            if !chain.contains(kind.as_str()) {
                return Err(ResourceError::InvalidOverride {
                    kind: kind.to_string(),
                    reason: "kind is not part of the resource chain".to_string(),
                });
            }
            if let Some(field) = entry.first_blank() {
                return Err(ResourceError::InvalidOverride {
                    kind: kind.to_string(),
                    reason: format!("{field} is blank"),
                });
            }
        }

        let defaults = NamingOverrides::default();
        let entries: BTreeMap<ResourceKind, ResourceNaming> = chain
            .iter()
            .map(|kind| {
                let entry = overrides.get(kind).unwrap_or(&defaults);
                let naming = ResourceNaming::resolve(kind, chain.is_primary(kind.as_str()), entry);
                (kind.clone(), naming)
            })
            .collect();

        let policy = Self { entries };
        policy.check_slots(chain)?;
        Ok(policy)
    }

    /// Object and collection slots live in separate namespaces; within one
    /// namespace every slot belongs to exactly one kind.
    fn check_slots(&self, chain: &ResourceChain) -> Result<(), ResourceError> {
        let shapes: [fn(&ResourceNaming) -> &str; 2] = [
            ResourceNaming::object_cache_slot,
            ResourceNaming::collection_cache_slot,
        ];
        for slot_of in shapes {
            let mut owners: HashMap<&str, &ResourceKind> = HashMap::new();
            for kind in chain {
                let slot = slot_of(&self.entries[kind]);
                if let Some(first) = owners.insert(slot, kind) {
                    return Err(ResourceError::NameCollision {
                        name: slot.to_string(),
                        first: first.to_string(),
                        second: kind.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, kind: &str) -> Option<&ResourceNaming> {
        self.entries.get(kind)
    }

    /// Naming for a kind known to be in the chain.
    pub(crate) fn of(&self, kind: &str) -> Result<&ResourceNaming, ResourceError> {
        self.get(kind)
            .ok_or_else(|| ResourceError::UnknownKind(kind.to_string()))
    }
}
