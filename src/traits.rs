use itertools::Itertools;

use crate::error::ResourceError;
use crate::types::{ResourceKind, RouteArg, RouteOptions};

/// The query engine behind the resources, e.g. an ORM.
///
/// Queries are unexecuted until passed to [`find`](BackingStore::find) or
/// [`materialize_all`](BackingStore::materialize_all), so scopes can be
/// chained onto them first.
pub trait BackingStore {
    /// A loaded record.
    type Object: Clone;
    /// An unexecuted, chainable query.
    type Query;

    /// The root query for a backing class, e.g. `Item`.
    fn class_for(&self, class_name: &str) -> Result<Self::Query, ResourceError>;

    /// Run `method` against `query` for `id`; `Ok(None)` when nothing matches.
    fn find(
        &self,
        query: Self::Query,
        method: &str,
        id: &str,
    ) -> Result<Option<Self::Object>, ResourceError>;

    /// The child collection `accessor` of `parent`, unexecuted.
    fn collection_for(
        &self,
        parent: &Self::Object,
        accessor: &str,
    ) -> Result<Self::Query, ResourceError>;

    /// Narrow `query` with the named scope.
    fn apply_scope(&self, query: Self::Query, scope: &str) -> Result<Self::Query, ResourceError>;

    /// Execute `query` and load every row, in query order.
    fn materialize_all(&self, query: Self::Query) -> Result<Vec<Self::Object>, ResourceError>;

    /// URL parameter form of an object, usually its id.
    fn to_param(&self, object: &Self::Object) -> String;

    /// Collapse several identifiers into one; default joins them with `/`.
    fn to_composite_id(&self, ids: &[String]) -> String {
        ids.iter().join("/")
    }
}

/// Builds the response for a failed guard lookup.
pub trait NotFoundHandler {
    type Response;

    fn not_found(&self, kind: &ResourceKind) -> Self::Response;
}

/// The host framework's named route functions.
pub trait RouteTable<O> {
    /// Call the route named `name` with positional arguments and options.
    fn call(
        &self,
        name: &str,
        args: &[RouteArg<O>],
        options: &RouteOptions,
    ) -> Result<String, ResourceError>;

    /// Call the un-nested route `name` with an options map only.
    fn call_with_options(&self, name: &str, options: &RouteOptions)
    -> Result<String, ResourceError>;
}
