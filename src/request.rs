//! Per-request state: parameters, the active set and the lookup cache.

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::cache::RequestCache;
use crate::controller::{Accessor, ResourceController};
use crate::error::ResourceError;
use crate::traits::BackingStore;
use crate::types::{ActiveSet, Params};

/// What an accessor returned.
#[derive(Debug, PartialEq)]
pub enum AccessorValue<'a, O> {
    Object(Option<&'a O>),
    Present(bool),
    Collection(&'a [O]),
}

/// One request's view of a [`ResourceController`].
///
/// Create one per request and drop it when the request ends. The lookup
/// cache lives inside, so nothing resolved here is visible to any other
/// request.
pub struct ResourceRequest<'c, S: BackingStore> {
    pub(crate) controller: &'c ResourceController,
    pub(crate) store: &'c S,
    pub(crate) params: Params,
    active: OnceCell<ActiveSet>,
    pub(crate) cache: RequestCache<S::Object>,
}

impl<'c, S: BackingStore> ResourceRequest<'c, S> {
    pub fn new(controller: &'c ResourceController, store: &'c S, params: Params) -> Self {
        Self {
            controller,
            store,
            params,
            active: OnceCell::new(),
            cache: RequestCache::new(),
        }
    }

    pub fn controller(&self) -> &'c ResourceController {
        self.controller
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn cache(&self) -> &RequestCache<S::Object> {
        &self.cache
    }

    /// The active resources, classified on first use and fixed afterwards.
    pub fn active(&self) -> &ActiveSet {
        self.active.get_or_init(|| {
            let active = ActiveSet::classify(
                self.controller.chain(),
                &self.params,
                self.controller.naming(),
            );
            debug!(event = "Request", phase = "Classified", active = active.to_string());
            active
        })
    }

    /// Whether `kind` is present in this request. The primary resource
    /// always is.
    pub fn has_resource(&self, kind: &str) -> bool {
        self.active().contains(kind)
    }

    /// Run the accessor registered under `name`, e.g. `category`,
    /// `category?` or `categories`.
    pub fn access(&mut self, name: &str) -> Result<AccessorValue<'_, S::Object>, ResourceError> {
        let controller = self.controller;
        let accessor = controller
            .accessor(name)
            .ok_or_else(|| ResourceError::UnknownAccessor(name.to_string()))?;

        match accessor {
            Accessor::Object(kind) => Ok(AccessorValue::Object(self.object(kind.as_str())?)),
            Accessor::Present(kind) => Ok(AccessorValue::Present(self.has_resource(kind.as_str()))),
            Accessor::Collection(kind) => {
                Ok(AccessorValue::Collection(self.collection(kind.as_str())?))
            }
        }
    }
}
