//! Controller declarations: the resource chain, its naming, and the
//! accessor, route helper and guard filter tables built from them.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::info;

use crate::error::ResourceError;
use crate::guards::GuardFilter;
use crate::naming::{NamingOverrides, NamingPolicy, ResourceNaming};
use crate::request::ResourceRequest;
use crate::routes::route_name;
use crate::traits::BackingStore;
use crate::types::{Params, ResourceChain, ResourceKind, RouteForm, RouteVariant, UrlSuffix};

/// A per-request accessor, registered under its accessor name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "accessor", content = "kind", rename_all = "snake_case")]
pub enum Accessor {
    /// `category`: the resolved object.
    Object(ResourceKind),
    /// `category?`: whether the resource is active.
    Present(ResourceKind),
    /// `categories`: every row of the scoped collection.
    Collection(ResourceKind),
}

/// A route helper for the primary resource, e.g. `edit_item_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteHelper {
    kind: ResourceKind,
    variant: RouteVariant,
}

impl RouteHelper {
    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn variant(&self) -> RouteVariant {
        self.variant
    }
}

/// The nested-resource setup of one controller.
///
/// Built once, immutable afterwards, and shared by every request the
/// controller handles.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceController {
    chain: ResourceChain,
    naming: NamingPolicy,
    accessors: BTreeMap<String, Accessor>,
    helpers: BTreeMap<String, RouteHelper>,
    filters: Vec<GuardFilter>,
}

impl ResourceController {
    /// Declare a controller over `chain` (outer to inner; the last kind is
    /// the primary resource) with per-kind naming overrides.
    pub fn declare<I, K>(
        chain: I,
        overrides: HashMap<ResourceKind, NamingOverrides>,
    ) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ResourceKind>,
    {
        Self::build(ResourceChain::new(chain)?, &overrides, Vec::new())
    }

    pub fn builder<I, K>(chain: I) -> ResourceControllerBuilder
    where
        I: IntoIterator<Item = K>,
        K: Into<ResourceKind>,
    {
        ResourceControllerBuilder::new(chain)
    }

    pub(crate) fn build(
        chain: ResourceChain,
        overrides: &HashMap<ResourceKind, NamingOverrides>,
        mut filters: Vec<GuardFilter>,
    ) -> Result<Self, ResourceError> {
        let naming = NamingPolicy::build(&chain, overrides)?;

        for filter in &filters {
            if !chain.contains(filter.kind().as_str()) {
                return Err(ResourceError::InvalidOverride {
                    kind: filter.kind().to_string(),
                    reason: "guard filter names a kind outside the resource chain".to_string(),
                });
            }
        }
        // Stable: declaration order is kept within a stage.
        filters.sort_by_key(GuardFilter::stage);

        let accessors = accessor_table(&chain, &naming)?;
        let primary = chain.primary();
        let helpers = helper_table(primary, naming.of(primary.as_str())?)?;

        info!(
            event = "Declare",
            chain = chain.to_string(),
            accessors = accessors.len(),
            helpers = helpers.len(),
            filters = filters.len()
        );

        Ok(Self {
            chain,
            naming,
            accessors,
            helpers,
            filters,
        })
    }

    pub fn chain(&self) -> &ResourceChain {
        &self.chain
    }

    pub fn primary(&self) -> &ResourceKind {
        self.chain.primary()
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    pub fn accessors(&self) -> impl Iterator<Item = (&String, &Accessor)> {
        self.accessors.iter()
    }

    pub fn helper(&self, name: &str) -> Option<&RouteHelper> {
        self.helpers.get(name)
    }

    pub fn helpers(&self) -> impl Iterator<Item = (&String, &RouteHelper)> {
        self.helpers.iter()
    }

    /// Registered guard filters, in the order they run.
    pub fn filters(&self) -> &[GuardFilter] {
        &self.filters
    }

    /// Start a request against `store` with the request's parameters.
    pub fn request<'c, S: BackingStore>(
        &'c self,
        store: &'c S,
        params: Params,
    ) -> ResourceRequest<'c, S> {
        ResourceRequest::new(self, store, params)
    }
}

fn accessor_table(
    chain: &ResourceChain,
    naming: &NamingPolicy,
) -> Result<BTreeMap<String, Accessor>, ResourceError> {
    let mut table: BTreeMap<String, Accessor> = BTreeMap::new();
    let mut owners: HashMap<String, &ResourceKind> = HashMap::new();

    for kind in chain {
        let names = naming.of(kind.as_str())?;
        let entries = [
            (names.accessor_name().to_string(), Accessor::Object(kind.clone())),
            (names.predicate_name(), Accessor::Present(kind.clone())),
            (
                names.collection_accessor_name().to_string(),
                Accessor::Collection(kind.clone()),
            ),
        ];
        for (name, accessor) in entries {
            if let Some(first) = owners.insert(name.clone(), kind) {
                return Err(ResourceError::NameCollision {
                    name,
                    first: first.to_string(),
                    second: kind.to_string(),
                });
            }
            table.insert(name, accessor);
        }
    }
    Ok(table)
}

/// Every (format, form, suffix) combination for the primary resource.
fn helper_table(
    primary: &ResourceKind,
    naming: &ResourceNaming,
) -> Result<BTreeMap<String, RouteHelper>, ResourceError> {
    let mut table = BTreeMap::new();
    for formatted in [false, true] {
        for form in RouteForm::iter() {
            for suffix in UrlSuffix::iter() {
                let variant = RouteVariant {
                    formatted,
                    form,
                    suffix,
                };
                let target = if form.is_plural() {
                    naming.plural_route_part()
                } else {
                    naming.route_part()
                };
                let name = route_name(&variant, [], target);
                let helper = RouteHelper {
                    kind: primary.clone(),
                    variant,
                };
                if table.insert(name.clone(), helper).is_some() {
                    return Err(ResourceError::NameCollision {
                        name,
                        first: primary.to_string(),
                        second: primary.to_string(),
                    });
                }
            }
        }
    }
    Ok(table)
}

/// Fluent construction of a [`ResourceController`].
#[derive(Debug, Clone)]
pub struct ResourceControllerBuilder {
    chain: Vec<ResourceKind>,
    overrides: HashMap<ResourceKind, NamingOverrides>,
    filters: Vec<GuardFilter>,
}

impl ResourceControllerBuilder {
    pub fn new<I, K>(chain: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ResourceKind>,
    {
        Self {
            chain: chain.into_iter().map(Into::into).collect(),
            overrides: HashMap::new(),
            filters: Vec::new(),
        }
    }

    /// Replace the naming overrides for `kind`.
    pub fn naming(mut self, kind: impl Into<ResourceKind>, overrides: NamingOverrides) -> Self {
        self.overrides.insert(kind.into(), overrides);
        self
    }

    pub fn filter(mut self, filter: GuardFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Shorthand for `filter(GuardFilter::require(kind))`.
    pub fn require(self, kind: impl Into<ResourceKind>) -> Self {
        self.filter(GuardFilter::require(kind))
    }

    /// Shorthand for `filter(GuardFilter::sometimes_require(kind))`.
    pub fn sometimes_require(self, kind: impl Into<ResourceKind>) -> Self {
        self.filter(GuardFilter::sometimes_require(kind))
    }

    pub fn build(self) -> Result<ResourceController, ResourceError> {
        ResourceController::build(ResourceChain::new(self.chain)?, &self.overrides, self.filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::{FilterStage, GuardMode};

    fn controller() -> ResourceController {
        ResourceController::declare(["collection", "category", "item"], HashMap::new()).unwrap()
    }

    #[test]
    fn test_accessor_table() {
        let controller = controller();
        assert_eq!(
            controller.accessor("category"),
            Some(&Accessor::Object("category".into()))
        );
        assert_eq!(
            controller.accessor("category?"),
            Some(&Accessor::Present("category".into()))
        );
        assert_eq!(
            controller.accessor("items"),
            Some(&Accessor::Collection("item".into()))
        );
        assert_eq!(controller.accessors().count(), 9);
        assert!(controller.accessor("shelf").is_none());
    }

    #[test]
    fn test_helper_table_covers_every_variant() {
        let controller = controller();
        let names: Vec<&str> = controller.helpers().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names.len(), 16);
        for expected in [
            "item_path",
            "item_url",
            "edit_item_path",
            "new_item_url",
            "items_path",
            "formatted_item_path",
            "formatted_edit_item_url",
            "formatted_new_item_path",
            "formatted_items_url",
        ] {
            assert!(names.contains(&expected), "missing helper {expected}");
        }

        let helper = controller.helper("formatted_edit_item_url").unwrap();
        assert_eq!(helper.kind().as_str(), "item");
        assert_eq!(
            helper.variant(),
            RouteVariant::url(RouteForm::Edit).formatted()
        );
    }

    #[test]
    fn test_helpers_follow_route_part_overrides() {
        let controller = ResourceController::builder(["category", "item"])
            .naming(
                "item",
                NamingOverrides::new()
                    .route_part("entry")
                    .plural_route_part("entries"),
            )
            .build()
            .unwrap();
        assert!(controller.helper("edit_entry_path").is_some());
        assert!(controller.helper("entries_url").is_some());
        assert!(controller.helper("item_path").is_none());
    }

    #[test]
    fn test_controller_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResourceController>();
    }

    #[test]
    fn test_uncountable_primary() {
        let controller = ResourceController::declare(["category", "sheep"], HashMap::new()).unwrap();
        assert_eq!(controller.helpers().count(), 16);
        assert_eq!(
            controller.helper("sheep_path").unwrap().variant(),
            RouteVariant::path(RouteForm::Member)
        );
        assert_eq!(
            controller.helper("sheep_index_path").unwrap().variant(),
            RouteVariant::path(RouteForm::Index)
        );
        assert_eq!(
            controller.accessor("sheep_index"),
            Some(&Accessor::Collection("sheep".into()))
        );
        assert_eq!(
            controller.accessor("sheep"),
            Some(&Accessor::Object("sheep".into()))
        );
    }

    #[test]
    fn test_helper_name_collision() {
        let err = ResourceController::builder(["item"])
            .naming("item", NamingOverrides::new().plural_route_part("item"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ResourceError::NameCollision {
                name: "item_path".into(),
                first: "item".into(),
                second: "item".into(),
            }
        );
    }

    #[test]
    fn test_accessor_collision() {
        let err = ResourceController::builder(["category", "item"])
            .naming("item", NamingOverrides::new().accessor_name("category"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ResourceError::NameCollision {
                name: "category".into(),
                first: "category".into(),
                second: "item".into(),
            }
        );
    }

    #[test]
    fn test_filters_sorted_by_stage() {
        let controller = ResourceController::builder(["collection", "category", "item"])
            .require("item")
            .sometimes_require("category")
            .filter(GuardFilter::require("collection").at_stage(FilterStage::PrependBeforeAction))
            .build()
            .unwrap();

        let order: Vec<(&str, GuardMode)> = controller
            .filters()
            .iter()
            .map(|f| (f.kind().as_str(), f.mode()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("collection", GuardMode::Require),
                ("item", GuardMode::Require),
                ("category", GuardMode::SometimesRequire),
            ]
        );
    }

    #[test]
    fn test_filter_for_unknown_kind() {
        let err = ResourceController::builder(["category", "item"])
            .require("shelf")
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_declare_rejects_bad_chain() {
        let empty: Vec<&str> = vec![];
        assert_eq!(
            ResourceController::declare(empty, HashMap::new()).unwrap_err(),
            ResourceError::EmptyChain
        );
        assert_eq!(
            ResourceController::declare(["item", "item"], HashMap::new()).unwrap_err(),
            ResourceError::DuplicateKind("item".into())
        );
    }
}
