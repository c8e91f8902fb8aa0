//! Scoped lookups of resource objects and collections.
//!
//! A kind with an active parent is looked up through the parent object's
//! collection (`collection.categories`); one without starts from its backing
//! class (`Category`). Named scopes are then applied in declared order, and
//! the finder runs last. Every result, misses included, is memoized in the
//! request cache, so each kind is queried at most once per request.

use tracing::debug;

use crate::error::ResourceError;
use crate::metrics::LookupShape;
use crate::request::ResourceRequest;
use crate::timers::LookupTimer;
use crate::traits::BackingStore;
use crate::types::ResourceKind;

/// A collection lookup: loaded rows, or the query left unexecuted.
#[derive(Debug, PartialEq)]
pub enum Collection<'a, O, Q> {
    Loaded(&'a [O]),
    /// `None` when the active parent could not be found.
    Query(Option<Q>),
}

impl<'c, S: BackingStore> ResourceRequest<'c, S> {
    /// Nearest active kind outside `kind`, scanning inner to outer.
    pub fn parent_of(&self, kind: &str) -> Result<Option<&'c ResourceKind>, ResourceError> {
        let controller = self.controller;
        let chain = controller.chain();
        if !chain.contains(kind) {
            return Err(ResourceError::UnknownKind(kind.to_string()));
        }
        let active = self.active();
        Ok(chain
            .outer_of(kind)
            .iter()
            .rev()
            .find(|outer| active.contains(outer.as_str())))
    }

    /// The unexecuted, scoped query for `kind`.
    ///
    /// Returns `None` when the active parent resolves to nothing: there is
    /// no collection to scope, and a lookup through it must miss.
    pub fn scope(&mut self, kind: &str) -> Result<Option<S::Query>, ResourceError> {
        let controller = self.controller;
        let naming = controller.naming().of(kind)?;
        let store = self.store;

        let query = match self.parent_of(kind)? {
            Some(parent) => {
                let Some(parent_object) = self.object(parent.as_str())?.cloned() else {
                    debug!(
                        event = "Resolve",
                        phase = "Scope",
                        kind = kind,
                        parent = parent.as_str(),
                        "parent not found"
                    );
                    return Ok(None);
                };
                store.collection_for(&parent_object, naming.parent_collection_accessor())?
            }
            None => store.class_for(naming.backing_class())?,
        };

        let query = naming
            .scope_names()
            .iter()
            .try_fold(query, |query, scope| store.apply_scope(query, scope))?;
        Ok(Some(query))
    }

    /// The object for `kind`, looked up once per request.
    ///
    /// `Ok(None)` when the identifying parameter is missing or the finder
    /// matched nothing. Store failures are returned and not cached.
    pub fn object(&mut self, kind: &str) -> Result<Option<&S::Object>, ResourceError> {
        let controller = self.controller;
        let naming = controller.naming().of(kind)?;
        let slot = naming.object_cache_slot();
        let mut timer = LookupTimer::start(kind, LookupShape::Object);

        if self.cache.has_object(slot) {
            timer.cache_hit();
        } else {
            let id = self.params.present(naming.finder_param()).map(str::to_owned);
            let found = match id {
                Some(id) => match self.scope(kind)? {
                    Some(query) => self.store.find(query, naming.finder_method(), &id)?,
                    None => None,
                },
                None => None,
            };
            debug!(
                event = "Resolve",
                phase = "Object",
                kind = kind,
                slot = slot,
                found = found.is_some()
            );
            self.cache.store_object(slot, found);
        }

        let object = self.cache.object(slot);
        timer.found(object.is_some());
        Ok(object)
    }

    /// Every row for `kind`, loaded once per request.
    pub fn collection(&mut self, kind: &str) -> Result<&[S::Object], ResourceError> {
        let controller = self.controller;
        let naming = controller.naming().of(kind)?;
        let slot = naming.collection_cache_slot();
        let mut timer = LookupTimer::start(kind, LookupShape::Collection);

        if self.cache.has_collection(slot) {
            timer.cache_hit();
        } else {
            let rows = match self.scope(kind)? {
                Some(query) => self.store.materialize_all(query)?,
                None => Vec::new(),
            };
            debug!(
                event = "Resolve",
                phase = "Collection",
                kind = kind,
                slot = slot,
                rows = rows.len()
            );
            self.cache.store_collection(slot, rows);
        }

        timer.found(true);
        Ok(self.cache.collection(slot).unwrap_or_default())
    }

    /// The scoped query for `kind` without executing it, so callers can
    /// narrow it further. Bypasses the cache.
    pub fn collection_query(&mut self, kind: &str) -> Result<Option<S::Query>, ResourceError> {
        self.scope(kind)
    }

    /// [`collection`](Self::collection) when `execute` is set, otherwise
    /// [`collection_query`](Self::collection_query).
    pub fn collection_with(
        &mut self,
        kind: &str,
        execute: bool,
    ) -> Result<Collection<'_, S::Object, S::Query>, ResourceError> {
        if execute {
            Ok(Collection::Loaded(self.collection(kind)?))
        } else {
            Ok(Collection::Query(self.collection_query(kind)?))
        }
    }

    /// The object of the primary resource's nearest active parent.
    pub fn parent(&mut self) -> Result<Option<&S::Object>, ResourceError> {
        let controller = self.controller;
        let primary = controller.chain().primary();
        match self.parent_of(primary.as_str())? {
            Some(parent) => self.object(parent.as_str()),
            None => Ok(None),
        }
    }
}
