//! Route synthesis for nested resources.
//!
//! A route name is built from the active resources outside the target,
//! outer to inner: with `collection` and `category` active, the member path
//! of `item` is `collection_category_item_path`, called with the collection
//! and category objects followed by the item.
//!
//! When the target has no active parent, the nested route would be the
//! plain one the host framework already defines (`item_path`). That case is
//! a bypass: positional identifiers are folded into the options map's `id`
//! and the route is called with options only.

use itertools::Itertools;
use serde_json::Value;
use tracing::debug;

use crate::error::ResourceError;
use crate::request::ResourceRequest;
use crate::traits::{BackingStore, RouteTable};
use crate::types::{ID_OPTION, RouteArg, RouteExtras, RoutePlan, RouteVariant};

const FORMATTED_PREFIX: &str = "formatted";

/// Join route name parts: `[formatted] [edit|new] parents... target suffix`.
pub(crate) fn route_name<'a>(
    variant: &RouteVariant,
    parents: impl IntoIterator<Item = &'a str>,
    target: &'a str,
) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if variant.formatted {
        parts.push(FORMATTED_PREFIX);
    }
    if let Some(prefix) = variant.form.action_prefix() {
        parts.push(prefix);
    }
    for parent in parents {
        parts.push(parent);
    }
    parts.push(target);
    parts.push(variant.suffix.as_ref());
    parts.iter().join("_")
}

impl<'c, S: BackingStore> ResourceRequest<'c, S> {
    /// Decide which route to call for `kind` and with what arguments.
    ///
    /// Fails with [`ResourceError::InactiveResource`] when `kind` is not
    /// active, and with [`ResourceError::MissingObject`] when a needed
    /// object cannot be resolved.
    pub fn synthesize_route(
        &mut self,
        kind: &str,
        variant: RouteVariant,
        item: Option<RouteArg<S::Object>>,
        extras: RouteExtras<S::Object>,
    ) -> Result<RoutePlan<S::Object>, ResourceError> {
        let controller = self.controller;
        let naming = controller.naming();
        let target = naming.of(kind)?;

        let ancestors: Vec<String> = self
            .active()
            .ancestors_of(kind)
            .ok_or_else(|| ResourceError::InactiveResource(kind.to_string()))?
            .iter()
            .map(|k| k.to_string())
            .collect();

        let target_part = if variant.form.is_plural() {
            target.plural_route_part()
        } else {
            target.route_part()
        };
        let item = if variant.form.takes_item() {
            item
        } else {
            if item.is_some() {
                debug!(
                    event = "Route",
                    phase = "Synthesize",
                    kind = kind,
                    variant = variant.to_string(),
                    "ignoring item for a route without one"
                );
            }
            None
        };

        if ancestors.is_empty() {
            let name = route_name(&variant, [], target_part);
            let mut options = extras.options;
            let ids: Vec<String> = item
                .iter()
                .chain(extras.positional.iter())
                .map(|arg| self.arg_param(arg))
                .collect();
            if !ids.is_empty() {
                options.insert(
                    ID_OPTION.to_string(),
                    Value::String(self.store.to_composite_id(&ids)),
                );
            }
            debug!(event = "Route", phase = "Bypass", name = name.as_str());
            return Ok(RoutePlan::Bypass { name, options });
        }

        let mut parts = Vec::with_capacity(ancestors.len());
        let mut args = Vec::with_capacity(ancestors.len() + 1 + extras.positional.len());
        for ancestor in &ancestors {
            parts.push(naming.of(ancestor)?.route_part());
            let object = self
                .object(ancestor)?
                .cloned()
                .ok_or_else(|| ResourceError::MissingObject(ancestor.clone()))?;
            args.push(RouteArg::Object(object));
        }

        if variant.form.takes_item() {
            let item = match item {
                Some(item) => item,
                None => self
                    .object(kind)?
                    .cloned()
                    .map(RouteArg::Object)
                    .ok_or_else(|| ResourceError::MissingObject(kind.to_string()))?,
            };
            args.push(item);
        }
        args.extend(extras.positional);

        let name = route_name(&variant, parts, target_part);
        debug!(
            event = "Route",
            phase = "Nested",
            name = name.as_str(),
            args = args.len()
        );
        Ok(RoutePlan::Nested {
            name,
            args,
            options: extras.options,
        })
    }

    /// Synthesize and call the route for `kind`.
    pub fn route<T: RouteTable<S::Object>>(
        &mut self,
        table: &T,
        kind: &str,
        variant: RouteVariant,
        item: Option<RouteArg<S::Object>>,
        extras: RouteExtras<S::Object>,
    ) -> Result<String, ResourceError> {
        let plan = self.synthesize_route(kind, variant, item, extras)?;
        dispatch(table, &plan)
    }

    /// Call a registered helper by name, e.g. `edit_item_path`.
    pub fn call_helper<T: RouteTable<S::Object>>(
        &mut self,
        table: &T,
        helper: &str,
        item: Option<RouteArg<S::Object>>,
        extras: RouteExtras<S::Object>,
    ) -> Result<String, ResourceError> {
        let controller = self.controller;
        let helper = controller
            .helper(helper)
            .ok_or_else(|| ResourceError::UnknownHelper(helper.to_string()))?;
        self.route(table, helper.kind().as_str(), helper.variant(), item, extras)
    }

    fn arg_param(&self, arg: &RouteArg<S::Object>) -> String {
        match arg {
            RouteArg::Object(object) => self.store.to_param(object),
            RouteArg::Value(Value::String(s)) => s.clone(),
            RouteArg::Value(value) => value.to_string(),
        }
    }
}

/// Call the route a plan names.
pub fn dispatch<O, T: RouteTable<O>>(table: &T, plan: &RoutePlan<O>) -> Result<String, ResourceError> {
    match plan {
        RoutePlan::Nested {
            name,
            args,
            options,
        } => table.call(name, args, options),
        RoutePlan::Bypass { name, options } => table.call_with_options(name, options),
    }
}
